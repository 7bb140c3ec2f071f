use std::path::Path;
use std::process;

use jyut_core::cache::{resolve_path, LookupKind, PhoneticCache};
use jyut_core::settings::settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn cache_info(flag: Option<&Path>) {
    let path = resolve_path(flag, &settings().cache);
    if !path.exists() {
        println!("{}: (no cache file)", path.display());
        return;
    }
    let cache = die!(
        PhoneticCache::open(&path),
        "Error reading cache {}: {}",
        path.display()
    );
    println!("{}", path.display());
    for kind in [LookupKind::Jyutping, LookupKind::Pinyin] {
        println!("  {kind}: {} entries", cache.count(kind));
    }
    println!("---");
    println!("{} entries", cache.len());
}

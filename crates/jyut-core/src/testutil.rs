use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{BackendError, Transliterator};
use crate::cache::PhoneticCache;
use crate::resolver::Resolver;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Single { scheme: String, text: String },
    Batch { scheme: String, texts: Vec<String> },
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Canned-answer backend that records every call. Unknown inputs map to "".
#[derive(Default)]
pub struct MockBackend {
    answers: HashMap<(String, String), String>,
    calls: CallLog,
    drop_last_in_batch: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, scheme: &str, text: &str, answer: &str) -> Self {
        self.answers
            .insert((scheme.to_string(), text.to_string()), answer.to_string());
        self
    }

    /// Make batch calls return one result too few.
    pub fn short_batches(mut self) -> Self {
        self.drop_last_in_batch = true;
        self
    }

    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    fn answer(&self, scheme: &str, text: &str) -> String {
        self.answers
            .get(&(scheme.to_string(), text.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl Transliterator for MockBackend {
    fn transliterate(&self, scheme: &str, text: &str) -> Result<String, BackendError> {
        self.calls.borrow_mut().push(Call::Single {
            scheme: scheme.to_string(),
            text: text.to_string(),
        });
        Ok(self.answer(scheme, text))
    }

    fn transliterate_batch(
        &self,
        scheme: &str,
        texts: &[String],
    ) -> Result<Vec<String>, BackendError> {
        self.calls.borrow_mut().push(Call::Batch {
            scheme: scheme.to_string(),
            texts: texts.to_vec(),
        });
        let mut out: Vec<String> = texts.iter().map(|t| self.answer(scheme, t)).collect();
        if self.drop_last_in_batch {
            out.pop();
        }
        Ok(out)
    }
}

/// Backend with the readings used across the resolver and grouping tests.
pub fn sample_backend() -> MockBackend {
    MockBackend::new()
        .with("zhy", "中文", "zung1 man4")
        .with("zhy", "中", "zung1")
        .with("zhy", "好", "HOU2")
        .with("zhy", "這好", "ze2 hou2")
        .with("zhy", "七", "cat7")
        .with("zhy", "嘅", "ge3")
        .with("zh", "zhōng", "zhong1")
        .with("zh", "zhòng", "zhong4")
        .with("zh", "zhōngwén", "zhong1wen2")
        .with("zh", "wén", "wen2")
        .with("zh", "hǎo", "hao3")
        .with("zh", "zhèr", "zher4")
        .with("zh", "zhèr hǎo", "zher4 hao3")
        .with("zh", "a", "a")
}

pub fn resolver_with(backend: MockBackend) -> (Resolver, CallLog) {
    let calls = backend.calls();
    let resolver = Resolver::with_schemes(Box::new(backend), PhoneticCache::new(), "zhy", "zh");
    (resolver, calls)
}

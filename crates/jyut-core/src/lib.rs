pub mod backend;
pub mod cache;
pub mod disambiguate;
pub mod resolver;
pub mod romanize;
pub mod settings;
pub mod syllable;
pub mod unicode;

#[cfg(test)]
mod testutil;

mod doh_translator;

pub use doh_translator::{DohQuestion, DohTranslator};

pub mod extractor;
pub mod jsonld;
pub mod parse;

pub use extractor::HtmlArticleExtractor;

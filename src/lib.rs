pub mod cli;
pub mod clipboard;
pub mod convert;
pub mod docs;
pub mod generator;
pub mod outline;
pub mod parser;
pub mod payload;

pub fn get_output_types() -> Vec<String> {
    vec![
        "markdown".to_string(),
        "html".to_string(),
        "slack".to_string(),
    ]
}

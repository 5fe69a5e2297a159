use clap::ValueEnum;

mod config_cmd;
mod fetch;
mod recipe;

pub use config_cmd::ConfigCommand;
pub use fetch::FetchCommand;
pub use recipe::RecipeCommand;

#[derive(Clone, Debug, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

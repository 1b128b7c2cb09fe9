pub mod args;
pub mod ci;
pub mod commands;
pub mod output;
pub mod settings;

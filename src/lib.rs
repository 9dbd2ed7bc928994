pub mod action;
pub mod api;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod google;
pub mod nlu;
pub mod openai;
pub mod prefs;
pub mod session;

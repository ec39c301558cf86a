mod batching;
mod classification;
mod helpers;
mod import;
mod time_scenarios;

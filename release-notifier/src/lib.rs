#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod checker;
pub mod config;
pub mod dispatcher;
pub mod model;
pub mod runner;
pub mod sinks;
pub mod upstream;

pub use checker::{Checker, SeenTable, WatchList, WatchedRepo};
pub use config::{load_env_file, parse_interval, Config, ConfigError, GitlabConfig};
pub use dispatcher::Dispatcher;
pub use model::{is_nonstable_tag, Release, Repository};
pub use runner::{Runner, RunnerError};
pub use sinks::{GitlabSink, Sink, SinkError, SlackSink};
pub use upstream::{GithubReleases, ReleaseSource, UpstreamError};

//! # Weekplan Core Library
//!
//! This library provides the planning engine behind the `weekplan` CLI:
//! it turns a user's deadline-bearing containers and their work items into
//! a week-by-week plan plus progress figures. The CLI is a thin layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Week math**: deadline to week-count conversion and Sunday-aligned
//!   week windows
//! - **Scheduler**: sequential fill of pending items into weekly buckets
//! - **Stats**: completion percentages and the "time needed" summary
//! - **Storage**: SQLite persistence for containers and items and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Planner`]: snapshot in, [`PlanReport`] out
//! - [`SequentialFillScheduler`]: the weekly bucketing pass
//! - [`Database`]: container and item persistence
//! - [`Config`]: application configuration management

pub mod container;
pub mod error;
pub mod item;
pub mod planner;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod week;

pub use container::{Container, PlanInput};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use item::{ItemKind, ItemStatus, ItemTab, KindCatalog, WorkItem};
pub use planner::{PlanReport, Planner};
pub use scheduler::{PlannedItem, SchedulerConfig, SequentialFillScheduler, TaggedItem, WeekBucket};
pub use stats::{Progress, ProgressAggregator, ProgressReport, TimeNeeded};
pub use storage::{Config, Database, NewItem};
pub use week::{weeks_until, WeekWindow};

//! # prompt-dedupe
//!
//! A near-duplicate record reconciliation engine for prompt libraries.
//!
//! Given a set of free-text records (a short `title` and a long `body`
//! each), the engine decides which records are "the same thing" despite
//! differing punctuation, whitespace, or minor edits, groups them by
//! transitive closure, picks a single survivor per group, and produces a
//! reproducible, reversible deletion plan backed by a durable audit report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌───────┐   ┌────────┐
//! │  Store   │──▶│ Comparator │──▶│ Clusters │──▶│ Plan  │──▶│ Report │
//! │ (SQLite) │   │  O(n²)     │   │ union-   │   │ keeper│   │ (JSON) │
//! └────┬─────┘   │  pairs     │   │ find     │   │ +drops│   └───┬────┘
//!      │         └───────────┘   └──────────┘   └───────┘       │
//!      │                                                        ▼
//!      └──────────────── batched delete ◀──── execute / replay-apply
//! ```
//!
//! The audit report is written before any delete (log-before-mutate), and
//! replay can re-derive the deletion list from a report alone, with no
//! recomputation and no original records required.
//!
//! ## Quick Start
//!
//! ```bash
//! pdd init                          # create database
//! pdd import prompts.json           # load records
//! pdd dedupe                        # dry-run: plan + report only
//! pdd dedupe --execute              # plan, log, then delete
//! pdd replay reports/dedupe-20250101-120000.json --execute
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`similarity`] | Edit-distance and shingle similarity, composite score |
//! | [`compare`] | Pairwise comparison and edge emission |
//! | [`cluster`] | Disjoint-set clustering |
//! | [`plan`] | Survivor selection and deletion planning |
//! | [`report`] | Audit report write path and replay extraction |
//! | [`engine`] | Pipeline orchestration: dry-run, execute, replay-apply |
//! | [`store`] | Record store trait, SQLite and in-memory backends |
//! | [`progress`] | Comparison progress reporting |
//! | [`errors`] | Fatal error taxonomy |
//! | [`migrate`] | Schema migrations |
//! | [`import`] | JSON import into the store |
//! | [`stats`] | Store overview |

pub mod cluster;
pub mod compare;
pub mod config;
pub mod engine;
pub mod errors;
pub mod import;
pub mod migrate;
pub mod models;
pub mod plan;
pub mod progress;
pub mod report;
pub mod similarity;
pub mod stats;
pub mod store;

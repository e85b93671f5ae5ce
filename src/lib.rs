//! codeprint - developer identity profiling from git history
//!
//! Mines a developer's repository checkouts for the signals an identity
//! profile is built from:
//!
//! - [`selection`]: which repositories are representative, using blame
//!   ownership, activity and recency
//! - [`temporal`]: sampled commit history of core files and statistical
//!   commit-timing patterns
//!
//! Git access goes through libgit2 ([`git`]); qualitative analyses go
//! through a language model behind [`ai::JsonResponder`].

pub mod ai;
pub mod config;
pub mod git;
pub mod models;
pub mod selection;
pub mod temporal;

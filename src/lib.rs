//! Taskdock: transactional data core for a desktop task organizer.
//!
//! This crate provides typed CRUD over tasks and categories, explicit
//! in-transaction maintenance of a denormalized per-category task counter
//! and an append-only audit trail, and a transactional
//! delete-category-with-tasks operation with full rollback. A UI shell
//! consumes [`board::services::TaskBoardService`] and renders what it
//! returns; nothing here pushes notifications of its own state changes.
//!
//! # Architecture
//!
//! Taskdock follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data types and validated mutation payloads
//! - **Ports**: The [`board::ports::TaskStore`] trait the service consumes
//! - **Adapters**: `PostgreSQL` (Diesel + r2d2) and in-memory implementations
//!
//! # Modules
//!
//! - [`board`]: The task/category/audit bounded context
//! - [`config`]: Database connection settings

pub mod board;
pub mod config;

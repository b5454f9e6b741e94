/// Money operations: amount validation and the deposit/withdraw/transfer
/// engine working against injected repositories.
pub mod account;

/// Interactive terminal menus and prompt helpers.
pub mod cli;

/// Application configuration (TOML with JSON fallback).
pub mod config;

/// Account and transaction stores: CSV-backed for the real application,
/// in-memory for tests.
pub mod storage;

/// User registration and credential-based login.
pub mod user;

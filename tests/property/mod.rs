// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module

mod payload_properties;
mod user_properties;

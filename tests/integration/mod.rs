// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod crawl_use_case_test;
pub mod helpers;
mod repositories;

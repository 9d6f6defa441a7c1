// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod documents;
pub mod iam;
pub mod login;
pub mod public;
pub mod runtime_paths;
pub mod templates;
pub mod util;

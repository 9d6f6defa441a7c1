// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod password;
pub mod store;

pub use password::{hash_password, verify_password};
pub use store::{UserStore, UserStoreError};

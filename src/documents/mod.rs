// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod names;
pub mod render;
pub mod store;

pub use names::{DocumentName, NameError};
pub use render::DocumentKind;
pub use store::{DocumentStore, StoreError};

// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod test_fixtures;

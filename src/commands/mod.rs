// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod profile;
pub mod ceilings;
pub mod month;
pub mod series;
pub mod projection;
pub mod dashboard;
pub mod reports;
pub mod simulate;
pub mod importer;
pub mod exporter;
pub mod snapshots;
pub mod reset;
pub mod doctor;

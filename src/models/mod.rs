// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Snapshots of upstream data as the proxy reads them.

pub(crate) mod lenient;
pub mod member;
pub mod workout;

pub use member::{HomeStudio, MemberClassSummary, MemberDetail};
pub use workout::{
    Coach, OtfClass, PerformanceSummary, Studio, TotalClasses, WorkoutDetails, ZoneTimeMinutes,
};

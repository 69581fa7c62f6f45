//! 駐車場ローテーションの計画
//!
//! リポジトリが 1 つのトランザクション内で読み出したデータ（[`RotationSnapshot`]）から、
//! 期限切れにする割り当てと新しく付与する割り当てを決める。
//! 計算は純粋関数で、書き込みは呼び出し側がまとめて 1 回でコミットする。
//!
//! 対象となる居住者は次の条件をすべて満たす者に限る。
//!
//! - ロールが居住者（管理者は対象外）
//! - 有効な車両を 1 台以上持っている
//! - 管理費の支払い状況が「支払い済み（current）」
//!
//! 今回期限切れになった居住者も、終了したばかりの待機者（優先度 0）として同じ列に並ぶ。
//!
//! 新しい割り当ての支払い状況は居住者の支払い状況から決まるため、
//! 上記の条件のもとでは常に `paid` になる。

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use shared::config::RotationConfig;

use crate::model::{
    id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId},
    parking::{AssignmentPaymentStatus, ParkingAssignment, ParkingSpot},
    resident::Resident,
    role::Role,
    vehicle::Vehicle,
};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPolicy {
    pub expiry_months: f64,
    pub grant_days: i64,
    pub days_per_month: f64,
}

impl RotationPolicy {
    /// `from` から `to` までの経過月数（小数）
    pub fn months_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
        (to - from).num_milliseconds() as f64 / (self.days_per_month * MILLIS_PER_DAY)
    }

    pub fn is_expired(&self, assignment: &ParkingAssignment, now: DateTime<Utc>) -> bool {
        self.months_between(assignment.start_date, now) >= self.expiry_months
    }

    pub fn grant_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.grant_days)
    }
}

impl From<&RotationConfig> for RotationPolicy {
    fn from(value: &RotationConfig) -> Self {
        Self {
            expiry_months: value.expiry_months,
            grant_days: value.grant_days,
            days_per_month: value.days_per_month,
        }
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from(&RotationConfig::default())
    }
}

/// ローテーション開始時点のデータ
#[derive(Debug, Clone, Default)]
pub struct RotationSnapshot {
    /// 居住者。この並び順が優先度が同じ場合の順序になる
    pub residents: Vec<Resident>,
    pub active_vehicles: Vec<Vehicle>,
    pub active_assignments: Vec<ParkingAssignment>,
    /// `available` 状態の駐車スペース。区画番号順
    pub available_spots: Vec<ParkingSpot>,
    /// 状態を問わないすべての割り当て
    pub history: Vec<ParkingAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpireAssignment {
    pub assignment_id: AssignmentId,
    pub resident_id: ResidentId,
    pub spot_id: ParkingSpotId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrantAssignment {
    pub resident_id: ResidentId,
    pub vehicle_id: VehicleId,
    pub spot_id: ParkingSpotId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: AssignmentPaymentStatus,
    /// 前回の割り当て終了からの経過月数
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationPlan {
    pub executed_at: DateTime<Utc>,
    pub expirations: Vec<ExpireAssignment>,
    pub grants: Vec<GrantAssignment>,
    /// 対象者のうち、今回スペースを得られなかった人数
    pub waiting: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSummary {
    pub removed: usize,
    pub assigned: usize,
    pub waiting: usize,
}

impl std::fmt::Display for RotationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ローテーションが完了しました。解除: {}、割り当て: {}、待機: {}",
            self.removed, self.assigned, self.waiting
        )
    }
}

struct Candidate<'a> {
    resident: &'a Resident,
    vehicle: &'a Vehicle,
    priority: f64,
}

impl RotationPlan {
    pub fn build(snapshot: &RotationSnapshot, policy: &RotationPolicy, now: DateTime<Utc>) -> Self {
        // 1. 期限切れの判定
        let expirations: Vec<ExpireAssignment> = snapshot
            .active_assignments
            .iter()
            .filter(|a| policy.is_expired(a, now))
            .map(|a| ExpireAssignment {
                assignment_id: a.assignment_id,
                resident_id: a.resident_id,
                spot_id: a.spot_id,
            })
            .collect();

        // 期限切れにならない割り当てが参照しているスペースは使えない
        let expiring: HashSet<AssignmentId> =
            expirations.iter().map(|e| e.assignment_id).collect();
        let still_held: HashSet<ParkingSpotId> = snapshot
            .active_assignments
            .iter()
            .filter(|a| !expiring.contains(&a.assignment_id))
            .map(|a| a.spot_id)
            .collect();

        // 2. 割り当てのない対象者を優先度つきで並べる
        //    今回期限切れになった居住者も対象に含める（終了日 = now とみなすので優先度は 0）
        let assigned: HashSet<ResidentId> = snapshot
            .active_assignments
            .iter()
            .filter(|a| !expiring.contains(&a.assignment_id))
            .map(|a| a.resident_id)
            .collect();

        let mut candidates: Vec<Candidate<'_>> = snapshot
            .residents
            .iter()
            .filter(|r| r.role == Role::Resident && r.is_current())
            .filter(|r| !assigned.contains(&r.resident_id))
            .filter_map(|resident| {
                let vehicle = snapshot
                    .active_vehicles
                    .iter()
                    .find(|v| v.active && v.resident_id == resident.resident_id)?;
                Some(Candidate {
                    resident,
                    vehicle,
                    priority: priority_of(snapshot, policy, &expiring, resident.resident_id, now),
                })
            })
            .collect();

        // 待機期間の長い順。sort_by は安定ソートなので同順位は元の並びを保つ
        candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        // 3. 解放されたスペース、元から空いているスペースの順に割り当てる
        let mut seen = HashSet::new();
        let pool: Vec<ParkingSpotId> = expirations
            .iter()
            .map(|e| e.spot_id)
            .chain(snapshot.available_spots.iter().map(|s| s.spot_id))
            .filter(|spot_id| !still_held.contains(spot_id))
            .filter(|spot_id| seen.insert(*spot_id))
            .collect();

        let end_date = policy.grant_end(now);
        let grants: Vec<GrantAssignment> = candidates
            .iter()
            .zip(pool.iter())
            .map(|(candidate, spot_id)| GrantAssignment {
                resident_id: candidate.resident.resident_id,
                vehicle_id: candidate.vehicle.vehicle_id,
                spot_id: *spot_id,
                start_date: now,
                end_date,
                payment_status: if candidate.resident.is_current() {
                    AssignmentPaymentStatus::Paid
                } else {
                    AssignmentPaymentStatus::Unpaid
                },
                priority: candidate.priority,
            })
            .collect();

        let waiting = candidates.len() - grants.len();

        Self {
            executed_at: now,
            expirations,
            grants,
            waiting,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expirations.is_empty() && self.grants.is_empty()
    }

    pub fn summary(&self) -> RotationSummary {
        RotationSummary {
            removed: self.expirations.len(),
            assigned: self.grants.len(),
            waiting: self.waiting,
        }
    }
}

// 直近（終了日が最も新しい）の過去の割り当てからの経過月数。履歴がなければ 0
// 今回期限切れになる割り当ては now に終了したものとみなす
fn priority_of(
    snapshot: &RotationSnapshot,
    policy: &RotationPolicy,
    expiring: &HashSet<AssignmentId>,
    resident_id: ResidentId,
    now: DateTime<Utc>,
) -> f64 {
    snapshot
        .history
        .iter()
        .filter(|a| a.resident_id == resident_id)
        .filter_map(|a| {
            if expiring.contains(&a.assignment_id) {
                Some(now)
            } else if a.is_active() {
                None
            } else {
                Some(a.end_date)
            }
        })
        .max()
        .map(|ended| policy.months_between(ended, now))
        .unwrap_or(0.0)
}

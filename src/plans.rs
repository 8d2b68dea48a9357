use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;

use crate::error::{CentboxError, Result};
use crate::generator::generate_amounts;
use crate::milestones::{self, Celebration};
use crate::models::{to_cents, CompletedSet, PlanSummary, ProgressSnapshot};
use crate::progress::aggregate;
use crate::store::{Store, StoreOp};

pub const PLANS_KEY: &str = "plans";
pub const MAX_OBJECTIVE: f64 = 1_000_000_000.0;
const ID_ATTEMPTS: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn objective_key(id: &str) -> String {
    format!("plan:{id}:objective")
}

pub fn marked_key(id: &str) -> String {
    format!("plan:{id}:marked")
}

/// A plan loaded from its authoritative keys.
#[derive(Debug, Clone)]
pub struct Plan {
    pub id: String,
    pub objective: f64,
    pub amounts: Vec<f64>,
    pub completed: CompletedSet,
}

impl Plan {
    pub fn progress(&self) -> ProgressSnapshot {
        aggregate(&self.amounts, &self.completed)
    }
}

#[derive(Debug, Clone)]
pub struct MarkOutcome {
    pub newly_marked: bool,
    pub progress: ProgressSnapshot,
    pub celebrations: Vec<Celebration>,
}

pub fn validate_objective(objective: f64) -> Result<f64> {
    if !objective.is_finite() {
        return Err(CentboxError::InvalidObjective("must be a finite number".to_string()));
    }
    if to_cents(objective) <= 0 {
        return Err(CentboxError::InvalidObjective(
            "must be at least one cent".to_string(),
        ));
    }
    if objective > MAX_OBJECTIVE {
        return Err(CentboxError::InvalidObjective(format!(
            "must not exceed {MAX_OBJECTIVE}"
        )));
    }
    Ok(to_cents(objective) as f64 / 100.0)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `<base36 millis>-<6 random base36 chars>`.
pub fn generate_plan_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{suffix}", to_base36(millis))
}

/// Accept a bare plan id or a share link ending in `/savings/<id>`.
pub fn parse_plan_ref(reference: &str) -> String {
    let trimmed = reference.trim().trim_end_matches('/');
    match trimmed.rfind("/savings/") {
        Some(pos) => trimmed[pos + "/savings/".len()..].to_string(),
        None => trimmed.to_string(),
    }
}

pub fn share_url(base: &str, id: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(':') {
        // scheme-only base such as "centbox://"
        format!("{base}//savings/{id}")
    } else {
        format!("{base}/savings/{id}")
    }
}

/// Savings plans on top of a key-value store.
pub struct PlanBook<S: Store> {
    store: S,
}

impl<S: Store> PlanBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("ignoring malformed value under {key}: {e}");
                Ok(None)
            }
        }
    }

    pub fn summaries(&self) -> Result<Vec<PlanSummary>> {
        Ok(self.read_json(PLANS_KEY)?.unwrap_or_default())
    }

    fn objective(&self, id: &str) -> Result<f64> {
        let Some(objective) = self.read_json::<f64>(&objective_key(id))? else {
            return Ok(0.0);
        };
        match validate_objective(objective) {
            Ok(objective) => Ok(objective),
            Err(e) => {
                log::warn!("ignoring stored objective for plan {id}: {e}");
                Ok(0.0)
            }
        }
    }

    fn completed(&self, id: &str) -> Result<CompletedSet> {
        Ok(self.read_json(&marked_key(id))?.unwrap_or_default())
    }

    /// Create a plan and return its summary.
    pub fn create(&self, objective: f64) -> Result<PlanSummary> {
        let objective = validate_objective(objective)?;

        let mut id = generate_plan_id();
        let mut attempts = 1;
        while self.store.get(&objective_key(&id))?.is_some() {
            if attempts >= ID_ATTEMPTS {
                return Err(CentboxError::IdCollision(attempts));
            }
            log::warn!("plan id {id} already in use, regenerating");
            id = generate_plan_id();
            attempts += 1;
        }

        let amounts = generate_amounts(objective);
        let summary = PlanSummary {
            id: id.clone(),
            objective,
            created_at: Utc::now().to_rfc3339(),
            progress: aggregate(&amounts, &CompletedSet::new()),
        };
        let mut summaries = self.summaries()?;
        summaries.push(summary.clone());

        self.store.apply(&[
            StoreOp::Put(objective_key(&id), serde_json::to_string(&objective)?),
            StoreOp::Put(marked_key(&id), serde_json::to_string(&CompletedSet::new())?),
            StoreOp::Put(PLANS_KEY.to_string(), serde_json::to_string(&summaries)?),
        ])?;
        log::info!("created plan {id} with objective {objective:.2} ({} boxes)", amounts.len());
        Ok(summary)
    }

    /// Load a plan. `None` when the id is unknown or its objective is
    /// missing or invalid.
    pub fn open(&self, id: &str) -> Result<Option<Plan>> {
        let objective = self.objective(id)?;
        if objective <= 0.0 {
            log::debug!("plan {id} not found");
            return Ok(None);
        }
        let completed = self.completed(id)?;
        log::debug!("opened plan {id} with {} marked box(es)", completed.len());
        Ok(Some(Plan {
            id: id.to_string(),
            objective,
            amounts: generate_amounts(objective),
            completed,
        }))
    }

    /// Recompute a plan's progress and refresh its cached summary.
    pub fn refresh(&self, plan: &Plan) -> Result<ProgressSnapshot> {
        let progress = plan.progress();
        let ops = self.summary_update(&plan.id, &progress)?;
        self.store.apply(&ops)?;
        Ok(progress)
    }

    fn summary_update(&self, id: &str, progress: &ProgressSnapshot) -> Result<Vec<StoreOp>> {
        let mut summaries = self.summaries()?;
        let mut changed = false;
        for summary in summaries.iter_mut().filter(|s| s.id == id) {
            if summary.progress != *progress {
                summary.progress = progress.clone();
                changed = true;
            }
        }
        if !changed {
            return Ok(Vec::new());
        }
        Ok(vec![StoreOp::Put(
            PLANS_KEY.to_string(),
            serde_json::to_string(&summaries)?,
        )])
    }

    /// Mark box `index` as deposited. Marking is one-way; repeating a mark
    /// changes nothing and fires no celebration.
    pub fn mark(&self, plan: &mut Plan, index: usize) -> Result<MarkOutcome> {
        if index >= plan.amounts.len() {
            return Err(CentboxError::BoxOutOfRange {
                index,
                total: plan.amounts.len(),
            });
        }
        let before = plan.progress();
        if !plan.completed.mark(index) {
            return Ok(MarkOutcome {
                newly_marked: false,
                progress: before,
                celebrations: Vec::new(),
            });
        }
        let after = plan.progress();

        let mut ops = vec![StoreOp::Put(
            marked_key(&plan.id),
            serde_json::to_string(&plan.completed)?,
        )];
        ops.extend(self.summary_update(&plan.id, &after)?);
        self.store.apply(&ops)?;
        log::debug!("plan {}: marked box {index}, {:.2}%", plan.id, after.percentage);

        Ok(MarkOutcome {
            newly_marked: true,
            celebrations: milestones::crossed(before.percentage, after.percentage),
            progress: after,
        })
    }

    /// Summaries with progress recomputed from each plan's own keys.
    /// Drifted cache entries are rewritten.
    pub fn list(&self) -> Result<Vec<PlanSummary>> {
        let mut summaries = self.summaries()?;
        let mut drifted = false;
        for summary in summaries.iter_mut() {
            let Some(plan) = self.open(&summary.id)? else {
                continue;
            };
            let progress = plan.progress();
            if summary.progress != progress {
                log::debug!("repairing cached progress for plan {}", summary.id);
                summary.progress = progress;
                drifted = true;
            }
        }
        if drifted {
            self.store
                .put(PLANS_KEY, &serde_json::to_string(&summaries)?)?;
        }
        Ok(summaries)
    }

    /// Remove a plan's summary and data. Returns false if nothing was there.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut summaries = self.summaries()?;
        let before = summaries.len();
        summaries.retain(|s| s.id != id);
        let existed =
            summaries.len() != before || self.store.get(&objective_key(id))?.is_some();

        self.store.apply(&[
            StoreOp::Put(PLANS_KEY.to_string(), serde_json::to_string(&summaries)?),
            StoreOp::Remove(marked_key(id)),
            StoreOp::Remove(objective_key(id)),
        ])?;
        if existed {
            log::info!("deleted plan {id}");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};

    fn book() -> PlanBook<MemoryStore> {
        PlanBook::new(MemoryStore::new())
    }

    #[test]
    fn test_create_writes_all_keys() {
        let book = book();
        let summary = book.create(10.0).unwrap();
        let store = book.store();
        assert_eq!(store.get(&objective_key(&summary.id)).unwrap().as_deref(), Some("10.0"));
        assert_eq!(store.get(&marked_key(&summary.id)).unwrap().as_deref(), Some("[]"));
        let summaries = book.summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, summary.id);
        assert_eq!(summaries[0].progress.total_boxes, 44);
    }

    #[test]
    fn test_create_rejects_bad_objectives() {
        let book = book();
        for bad in [0.0, -1.0, 0.001, f64::NAN, f64::INFINITY, MAX_OBJECTIVE * 2.0] {
            assert!(matches!(book.create(bad), Err(CentboxError::InvalidObjective(_))), "{bad}");
        }
        assert!(book.summaries().unwrap().is_empty());
    }

    #[test]
    fn test_objective_is_rounded_to_cents() {
        let book = book();
        let summary = book.create(12.346).unwrap();
        assert_eq!(summary.objective, 12.35);
    }

    #[test]
    fn test_open_unknown_plan_is_none() {
        assert!(book().open("nope").unwrap().is_none());
    }

    #[test]
    fn test_open_treats_malformed_values_as_defaults() {
        let book = book();
        book.store().put(&objective_key("x"), "\"lots\"").unwrap();
        assert!(book.open("x").unwrap().is_none());

        book.store().put(&objective_key("y"), "20").unwrap();
        book.store().put(&marked_key("y"), "{not json").unwrap();
        let plan = book.open("y").unwrap().unwrap();
        assert!(plan.completed.is_empty());

        book.store().put(&objective_key("z"), "0").unwrap();
        assert!(book.open("z").unwrap().is_none());

        book.store().put(PLANS_KEY, "garbage").unwrap();
        assert!(book.summaries().unwrap().is_empty());
    }

    #[test]
    fn test_open_rejects_out_of_range_objectives() {
        let book = book();
        book.store().put(&objective_key("big"), "1e300").unwrap();
        assert!(book.open("big").unwrap().is_none());

        book.store().put(&objective_key("tiny"), "0.001").unwrap();
        assert!(book.open("tiny").unwrap().is_none());

        book.store().put(&objective_key("ok"), "10.0").unwrap();
        let plan = book.open("ok").unwrap().unwrap();
        assert_eq!(plan.objective, 10.0);
        assert_eq!(plan.amounts.len(), 44);
    }

    #[test]
    fn test_mark_twice_is_noop() {
        let book = book();
        let id = book.create(10.0).unwrap().id;
        let mut plan = book.open(&id).unwrap().unwrap();
        let first = book.mark(&mut plan, 43).unwrap();
        assert!(first.newly_marked);
        let second = book.mark(&mut plan, 43).unwrap();
        assert!(!second.newly_marked);
        assert!(second.celebrations.is_empty());
        assert_eq!(first.progress, second.progress);
        let reloaded = book.open(&id).unwrap().unwrap();
        assert_eq!(reloaded.completed, plan.completed);
    }

    #[test]
    fn test_mark_out_of_range() {
        let book = book();
        let id = book.create(1.0).unwrap().id;
        let mut plan = book.open(&id).unwrap().unwrap();
        let total = plan.amounts.len();
        assert!(matches!(
            book.mark(&mut plan, total),
            Err(CentboxError::BoxOutOfRange { .. })
        ));
    }

    #[test]
    fn test_twenty_five_percent_fires_once() {
        let book = book();
        let id = book.create(10.0).unwrap().id;
        let mut plan = book.open(&id).unwrap().unwrap();

        let mut fired = Vec::new();
        let mut i = plan.amounts.len();
        while plan.progress().completed < 2.5 {
            i -= 1;
            fired.extend(book.mark(&mut plan, i).unwrap().celebrations);
        }
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].threshold, 25.0);

        let more = book.mark(&mut plan, 0).unwrap();
        assert!(more.celebrations.iter().all(|c| c.threshold != 25.0));
    }

    #[test]
    fn test_each_milestone_fires_exactly_once() {
        let book = book();
        let id = book.create(50.0).unwrap().id;
        let mut plan = book.open(&id).unwrap().unwrap();
        let mut fired = Vec::new();
        for i in 0..plan.amounts.len() {
            fired.extend(book.mark(&mut plan, i).unwrap().celebrations);
        }
        let thresholds: Vec<f64> = fired.iter().map(|c| c.threshold).collect();
        assert_eq!(thresholds, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(plan.progress().percentage, 100.0);
    }

    #[test]
    fn test_mark_updates_only_its_own_summary() {
        let book = book();
        let a = book.create(10.0).unwrap().id;
        let b = book.create(20.0).unwrap().id;
        let mut plan = book.open(&a).unwrap().unwrap();
        book.mark(&mut plan, 5).unwrap();

        let summaries = book.summaries().unwrap();
        let sa = summaries.iter().find(|s| s.id == a).unwrap();
        let sb = summaries.iter().find(|s| s.id == b).unwrap();
        assert_eq!(sa.progress.completed_boxes, 1);
        assert_eq!(sa.progress.completed, 0.06);
        assert_eq!(sb.progress.completed_boxes, 0);
        assert_eq!(sb.progress.completed, 0.0);
    }

    #[test]
    fn test_list_repairs_drifted_summary() {
        let book = book();
        let id = book.create(10.0).unwrap().id;
        book.store().put(&marked_key(&id), "[0,1,2]").unwrap();
        let listed = book.list().unwrap();
        assert_eq!(listed[0].progress.completed_boxes, 3);
        assert_eq!(listed[0].progress.completed, 0.06);
        let cached = book.summaries().unwrap();
        assert_eq!(cached[0].progress, listed[0].progress);
    }

    #[test]
    fn test_refresh_rewrites_summary() {
        let book = book();
        let id = book.create(10.0).unwrap().id;
        book.store().put(&marked_key(&id), "[43]").unwrap();
        let plan = book.open(&id).unwrap().unwrap();
        let progress = book.refresh(&plan).unwrap();
        assert_eq!(progress.completed, 0.54);
        assert_eq!(book.summaries().unwrap()[0].progress, progress);
    }

    #[test]
    fn test_delete_removes_everything() {
        let book = book();
        let keep = book.create(5.0).unwrap().id;
        let gone = book.create(10.0).unwrap().id;
        assert!(book.delete(&gone).unwrap());
        assert!(book.open(&gone).unwrap().is_none());
        assert_eq!(book.store().get(&marked_key(&gone)).unwrap(), None);
        let ids: Vec<String> = book.summaries().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![keep]);
        assert!(!book.delete(&gone).unwrap());
    }

    #[test]
    fn test_plans_survive_reopen_on_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let id = {
            let book = PlanBook::new(SqliteStore::open(&path).unwrap());
            let id = book.create(100.0).unwrap().id;
            let mut plan = book.open(&id).unwrap().unwrap();
            book.mark(&mut plan, 0).unwrap();
            id
        };
        let book = PlanBook::new(SqliteStore::open(&path).unwrap());
        let plan = book.open(&id).unwrap().unwrap();
        assert!(plan.completed.contains(0));
        assert_eq!(plan.amounts, generate_amounts(100.0));
    }

    #[test]
    fn test_plan_id_shape() {
        let id = generate_plan_id();
        let (stamp, suffix) = id.split_once('-').unwrap();
        assert!(!stamp.is_empty());
        assert_eq!(suffix.len(), 6);
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_parse_plan_ref() {
        assert_eq!(parse_plan_ref("abc-123"), "abc-123");
        assert_eq!(parse_plan_ref("centbox://savings/abc-123"), "abc-123");
        assert_eq!(parse_plan_ref("https://host.test/savings/abc-123/"), "abc-123");
    }

    #[test]
    fn test_share_url() {
        assert_eq!(share_url("centbox://", "abc"), "centbox://savings/abc");
        assert_eq!(share_url("https://host.test/", "abc"), "https://host.test/savings/abc");
        assert_eq!(parse_plan_ref(&share_url("centbox://", "abc")), "abc");
    }
}

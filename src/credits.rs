// Credit balance spent on AI generation and prompt refinement.
// A new ledger starts with the free grant; spending never goes below zero
// and a recharge never lifts the balance past the plan's limit.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// What a fresh ledger holds.
pub const FREE_CREDITS: u32 = 49;
/// Price of one generated image.
pub const IMAGE_COST: u32 = 5;
/// Price of one prompt refinement.
pub const PROMPT_COST: u32 = 2;

/// Recharge plans. The token count doubles as the balance cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditPlan {
    Starter,
    Plus,
    Pro,
}

impl CreditPlan {
    pub const ALL: [CreditPlan; 3] = [CreditPlan::Starter, CreditPlan::Plus, CreditPlan::Pro];

    pub fn tokens(self) -> u32 {
        match self {
            CreditPlan::Starter => 49,
            CreditPlan::Plus => 99,
            CreditPlan::Pro => 199,
        }
    }
}

impl fmt::Display for CreditPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreditPlan::Starter => "Starter",
            CreditPlan::Plus => "Plus",
            CreditPlan::Pro => "Pro",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditLedger {
    credits: u32,
}

impl Default for CreditLedger {
    fn default() -> Self {
        Self { credits: FREE_CREDITS }
    }
}

impl CreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> u32 {
        self.credits
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.credits >= cost
    }

    /// Take `amount` off the balance, stopping at zero. Returns the new balance.
    pub fn spend(&mut self, amount: u32) -> u32 {
        self.credits = self.credits.saturating_sub(amount);
        tracing::debug!(amount, balance = self.credits, "credits spent");
        self.credits
    }

    /// Add `amount`, capped at the plan's tokens (the free grant without a
    /// plan). A balance already above the cap is left as it is.
    pub fn recharge(&mut self, amount: u32, plan: Option<CreditPlan>) -> u32 {
        let cap = plan.map(CreditPlan::tokens).unwrap_or(FREE_CREDITS);
        let topped = self.credits.saturating_add(amount).min(cap);
        self.credits = self.credits.max(topped);
        tracing::debug!(amount, ?plan, balance = self.credits, "credits recharged");
        self.credits
    }

    /// Back to the Starter plan's allowance.
    pub fn reset(&mut self) {
        self.credits = CreditPlan::Starter.tokens();
    }

    /// Load the ledger; a missing or empty file gives the free grant.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|e| Error::Credits(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Credits(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| Error::Credits(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_free_grant() {
        let l = CreditLedger::new();
        assert_eq!(l.balance(), FREE_CREDITS);
        assert!(l.can_afford(IMAGE_COST));
    }

    #[test]
    fn spending_floors_at_zero() {
        let mut l = CreditLedger::new();
        assert_eq!(l.spend(IMAGE_COST), 44);
        assert_eq!(l.spend(1000), 0);
        assert_eq!(l.spend(PROMPT_COST), 0);
        assert!(!l.can_afford(PROMPT_COST));
        assert!(l.can_afford(0));
    }

    #[test]
    fn recharge_is_capped_by_plan() {
        let mut l = CreditLedger::new();
        l.spend(FREE_CREDITS);
        assert_eq!(l.recharge(500, None), FREE_CREDITS);
        assert_eq!(l.recharge(CreditPlan::Pro.tokens(), Some(CreditPlan::Plus)), 99);
        assert_eq!(l.recharge(CreditPlan::Pro.tokens(), Some(CreditPlan::Pro)), 199);
        // A smaller plan's cap never takes credits away.
        assert_eq!(l.recharge(10, Some(CreditPlan::Starter)), 199);
    }

    #[test]
    fn reset_goes_to_starter() {
        let mut l = CreditLedger::new();
        l.recharge(200, Some(CreditPlan::Pro));
        l.reset();
        assert_eq!(l.balance(), 49);
    }

    #[test]
    fn load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credits.json");
        assert_eq!(CreditLedger::load(&path).unwrap().balance(), FREE_CREDITS);

        let mut l = CreditLedger::new();
        l.spend(7);
        l.save(&path).unwrap();
        assert_eq!(CreditLedger::load(&path).unwrap(), l);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CreditLedger::load(&path), Err(Error::Credits(_))));
    }

    #[test]
    fn plans_print_their_names() {
        let names: Vec<String> = CreditPlan::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["Starter", "Plus", "Pro"]);
    }
}

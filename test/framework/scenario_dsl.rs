//! # Scenario DSL
//!
//! Given/When/Then builder for readable end-to-end vault scenarios.
//!
//! ```rust,ignore
//! Scenario::new("60/40 split")
//!     .given(|ctx| {
//!         let (owner, heirs) = ctx.harness.create_estate(&[6_000, 4_000]);
//!         ctx.harness.deposit(&owner, 100, 0);
//!         ctx.adopt(owner, heirs);
//!     })
//!     .when("death becomes final", |ctx| ctx.harness.finalize_death(&ctx.owners[0]))
//!     .then("the first heir gets 60", |ctx| {
//!         assert_eq!(ctx.harness.claim(&ctx.heirs[0][0], &ctx.owners[0], 0).native, 60);
//!     })
//!     .run();
//! ```

extern crate std;

use soroban_sdk::Address;
use std::boxed::Box;
use std::string::String;
use std::vec::Vec;

use sarcophagus::VaultConfig;

use super::invariants::{report, InvariantSet};
use super::{TestEnv, VaultHarness};

// ── Scenario Context ─────────────────────────────────────────────────────────

/// State handed to every step.
pub struct ScenarioContext<'a> {
    pub harness: &'a VaultHarness,
    pub owners: Vec<Address>,
    pub heirs: Vec<Vec<Address>>,
    /// Named values carried between steps.
    pub data: std::collections::HashMap<String, i128>,
}

impl<'a> ScenarioContext<'a> {
    fn new(harness: &'a VaultHarness) -> Self {
        Self {
            harness,
            owners: Vec::new(),
            heirs: Vec::new(),
            data: std::collections::HashMap::new(),
        }
    }

    /// Track an estate so invariants cover it.
    pub fn adopt(&mut self, owner: Address, heirs: Vec<Address>) {
        self.owners.push(owner);
        self.heirs.push(heirs);
    }

    pub fn store(&mut self, key: &str, value: i128) {
        self.data.insert(key.into(), value);
    }

    pub fn load(&self, key: &str) -> i128 {
        *self
            .data
            .get(key)
            .unwrap_or_else(|| panic!("Scenario variable '{}' not found", key))
    }
}

// ── Step Types ───────────────────────────────────────────────────────────────

type StepFn = Box<dyn FnOnce(&mut ScenarioContext<'_>)>;

struct Step {
    description: String,
    action: StepFn,
}

// ── Scenario Builder ─────────────────────────────────────────────────────────

/// Steps run in order; invariants, when attached, are checked between the
/// When and Then phases.
pub struct Scenario {
    name: String,
    config: VaultConfig,
    given_steps: Vec<Step>,
    when_steps: Vec<Step>,
    then_steps: Vec<Step>,
    invariants: Option<InvariantSet>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            config: VaultHarness::test_config(),
            given_steps: Vec::new(),
            when_steps: Vec::new(),
            then_steps: Vec::new(),
            invariants: None,
        }
    }

    pub fn with_config(mut self, config: VaultConfig) -> Self {
        self.config = config;
        self
    }

    pub fn given<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_>) + 'static,
    {
        self.given_steps.push(Step {
            description: String::from("given ..."),
            action: Box::new(action),
        });
        self
    }

    pub fn when<F>(mut self, description: &str, action: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_>) + 'static,
    {
        self.when_steps.push(Step {
            description: description.into(),
            action: Box::new(action),
        });
        self
    }

    pub fn then<F>(mut self, description: &str, assertion: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_>) + 'static,
    {
        self.then_steps.push(Step {
            description: description.into(),
            action: Box::new(assertion),
        });
        self
    }

    pub fn with_invariants(mut self, invariants: InvariantSet) -> Self {
        self.invariants = Some(invariants);
        self
    }

    pub fn run(self) {
        let harness = VaultHarness::new(TestEnv::new(), self.config);
        let mut ctx = ScenarioContext::new(&harness);

        for step in self
            .given_steps
            .into_iter()
            .chain(self.when_steps.into_iter())
        {
            std::eprintln!("  {}", step.description);
            (step.action)(&mut ctx);
        }

        if let Some(ref invariants) = self.invariants {
            let snapshot = harness.snapshot(&ctx.owners);
            let violations = invariants.check_all(&snapshot);
            if !violations.is_empty() {
                let title = std::format!("Scenario '{}': invariant violations after actions:", self.name);
                panic!("{}", report(&title, &violations));
            }
        }

        for step in self.then_steps {
            std::eprintln!("  then {}", step.description);
            (step.action)(&mut ctx);
        }
    }
}

// ── Assertion Helpers ────────────────────────────────────────────────────────

/// Assert that a `try_*` call failed with the expected contract error.
#[macro_export]
macro_rules! assert_contract_error {
    ($result:expr, $expected:expr) => {
        match $result {
            Err(Ok(e)) => assert_eq!(e, $expected, "Expected error {:?}, got {:?}", $expected, e),
            Err(Err(e)) => panic!("Unexpected SDK error: {:?}", e),
            Ok(_) => panic!("Expected error {:?}, but operation succeeded", $expected),
        }
    };
}

// ── Batch Scenario Runner ────────────────────────────────────────────────────

/// Run every scenario, returning `(passed, failed)`.
pub fn run_scenarios(scenarios: Vec<Scenario>) -> (usize, usize) {
    let total = scenarios.len();
    let mut failures = 0;

    for scenario in scenarios {
        let name = scenario.name.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scenario.run();
        }));
        match result {
            Ok(()) => std::eprintln!("  ✓ {}", name),
            Err(_) => {
                std::eprintln!("  ✗ {}", name);
                failures += 1;
            }
        }
    }

    (total - failures, failures)
}

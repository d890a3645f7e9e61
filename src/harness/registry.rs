//! Test cases and the registry that maps identifiers to them.

use crate::framer::Framer;
use crate::harness::verdict::Verdict;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Body of a test case.
///
/// A plain function: it cannot capture state, so every invocation starts
/// from scratch and the same id always replays the same exchange.
pub type TestFn = fn(&mut Framer) -> Verdict;

/// One conformance scenario.
#[derive(Clone, Copy)]
pub struct TestCase {
    pub id: u32,
    pub name: &'static str,
    run: TestFn,
}

impl TestCase {
    pub const fn new(id: u32, name: &'static str, run: TestFn) -> Self {
        Self { id, name, run }
    }

    /// Execute the scenario against the framer.
    pub fn run(&self, framer: &mut Framer) -> Verdict {
        (self.run)(framer)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &format_args!("{:#04x}", self.id))
            .field("name", &self.name)
            .finish()
    }
}

/// A named block of identifiers, e.g. one per protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: &'static str,
    pub ids: RangeInclusive<u32>,
}

impl Group {
    pub const fn new(name: &'static str, ids: RangeInclusive<u32>) -> Self {
        Self { name, ids }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("test id {id:#04x} registered twice ({existing} and {duplicate})")]
    DuplicateId {
        id: u32,
        existing: &'static str,
        duplicate: &'static str,
    },

    #[error("no test with id {0:#04x}")]
    UnknownId(u32),

    #[error("no test group named '{0}'")]
    UnknownGroup(String),
}

/// Identifier-ordered collection of test cases.
///
/// Built once at start-up and read-only afterwards; iteration is in
/// ascending id order.
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    cases: BTreeMap<u32, TestCase>,
    groups: Vec<Group>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test case; identifiers must be unique.
    pub fn register(&mut self, case: TestCase) -> Result<(), RegistryError> {
        if let Some(existing) = self.cases.get(&case.id) {
            return Err(RegistryError::DuplicateId {
                id: case.id,
                existing: existing.name,
                duplicate: case.name,
            });
        }
        self.cases.insert(case.id, case);
        Ok(())
    }

    /// Register every case in `cases`.
    pub fn register_all(
        &mut self,
        cases: impl IntoIterator<Item = TestCase>,
    ) -> Result<(), RegistryError> {
        cases.into_iter().try_for_each(|case| self.register(case))
    }

    /// Declare a reporting group.
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    pub fn get(&self, id: u32) -> Option<&TestCase> {
        self.cases.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Test cases in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.values()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Name of the group `id` falls into, if any.
    pub fn group_of(&self, id: u32) -> Option<&'static str> {
        self.groups
            .iter()
            .find(|g| g.ids.contains(&id))
            .map(|g| g.name)
    }

    /// Narrow the registry to the given ids and groups.
    ///
    /// An empty selection keeps everything. Unknown ids or group names are
    /// rejected rather than silently running nothing.
    pub fn select(&self, ids: &[u32], groups: &[String]) -> Result<Self, RegistryError> {
        if ids.is_empty() && groups.is_empty() {
            return Ok(self.clone());
        }

        let mut ranges = Vec::with_capacity(groups.len());
        for name in groups {
            let group = self
                .groups
                .iter()
                .find(|g| g.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| RegistryError::UnknownGroup(name.clone()))?;
            ranges.push(group.ids.clone());
        }
        if let Some(&id) = ids.iter().find(|id| !self.cases.contains_key(*id)) {
            return Err(RegistryError::UnknownId(id));
        }

        let cases = self
            .cases
            .iter()
            .filter(|&(&id, _)| ids.contains(&id) || ranges.iter().any(|r| r.contains(&id)))
            .map(|(&id, &case)| (id, case))
            .collect();

        Ok(Self {
            cases,
            groups: self.groups.clone(),
        })
    }
}

/// Parse a test id given as decimal or `0x`-prefixed hex.
pub fn parse_test_id(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

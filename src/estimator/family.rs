use crate::optimization::CostFunction;

/// The algorithms an estimator compares for one problem type.
pub struct AlgorithmFamily {
    name: String,
    members: Vec<Box<dyn CostFunction>>,
    default_exclusions: Vec<String>,
}

impl AlgorithmFamily {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
            default_exclusions: Vec::new(),
        }
    }

    pub fn with<C: CostFunction + 'static>(mut self, member: C) -> Self {
        self.members.push(Box::new(member));
        self
    }

    /// Skip `name` unless the configuration lists it in `included_algorithms`.
    pub fn excluded_by_default(mut self, name: &str) -> Self {
        self.default_exclusions.push(name.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    pub fn default_exclusions(&self) -> &[String] {
        &self.default_exclusions
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_members(self) -> Vec<Box<dyn CostFunction>> {
        self.members
    }
}

use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashMap};

/// A bidirectional mapping between variable names and identifiers.
///
/// The table exists for diagnostics (logging, model display): the solver
/// never relies on it for correctness. Identifiers are allocated externally
/// (see [IdCounter](crate::utils::IdCounter)) and registered here.
///
/// # Example
///
/// ```
/// # use skolibri::utils::VarNames;
/// let mut names = VarNames::default();
/// names.register(1, "x1").unwrap();
/// assert_eq!(Some(1), names.id_of("x1"));
/// assert_eq!("x1", names.name_of(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct VarNames {
    name_to_id: HashMap<String, usize>,
    id_to_name: BTreeMap<usize, String>,
}

impl VarNames {
    /// Associates a name with an identifier.
    ///
    /// An error is returned if the name is already associated with another identifier.
    pub fn register(&mut self, id: usize, name: &str) -> Result<()> {
        if let Some(other) = self.name_to_id.get(name) {
            if *other != id {
                return Err(anyhow!(
                    r#"the name "{}" is already associated with identifier {}"#,
                    name,
                    other
                ));
            }
            return Ok(());
        }
        self.name_to_id.insert(name.to_string(), id);
        self.id_to_name.insert(id, name.to_string());
        Ok(())
    }

    /// Replaces the name of an identifier, keeping the mapping bidirectional.
    ///
    /// Used for rolling diagnostic names (a rule-fire variable is renamed with
    /// its premise once the corresponding rule is installed).
    pub fn rename(&mut self, id: usize, name: &str) {
        if let Some(old) = self.id_to_name.insert(id, name.to_string()) {
            self.name_to_id.remove(&old);
        }
        self.name_to_id.insert(name.to_string(), id);
    }

    /// Returns the identifier associated with a name, if any.
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the name of an identifier, or `var<id>` if the identifier is anonymous.
    pub fn name_of(&self, id: usize) -> String {
        self.id_to_name
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("var{}", id))
    }

    /// Returns `true` if and only if the name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Returns the number of registered names.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Returns `true` if and only if no name is registered.
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut names = VarNames::default();
        names.register(1, "x").unwrap();
        names.register(2, "y").unwrap();
        assert_eq!(Some(1), names.id_of("x"));
        assert_eq!(Some(2), names.id_of("y"));
        assert_eq!("x", names.name_of(1));
        assert_eq!(2, names.len());
    }

    #[test]
    fn test_register_twice_is_ok() {
        let mut names = VarNames::default();
        names.register(1, "x").unwrap();
        names.register(1, "x").unwrap();
        assert_eq!(1, names.len());
    }

    #[test]
    fn test_register_conflict() {
        let mut names = VarNames::default();
        names.register(1, "x").unwrap();
        assert!(names.register(2, "x").is_err());
    }

    #[test]
    fn test_anonymous_name() {
        let names = VarNames::default();
        assert_eq!("var7", names.name_of(7));
    }

    #[test]
    fn test_rename() {
        let mut names = VarNames::default();
        names.register(1, "y_fire_1").unwrap();
        names.rename(1, "y_fire_1_premise_[2]");
        assert_eq!("y_fire_1_premise_[2]", names.name_of(1));
        assert!(!names.contains("y_fire_1"));
        assert_eq!(Some(1), names.id_of("y_fire_1_premise_[2]"));
    }

    #[test]
    fn test_is_empty() {
        let mut names = VarNames::default();
        assert!(names.is_empty());
        names.register(1, "x").unwrap();
        assert!(!names.is_empty());
    }
}

//! Sealed type bindings of a repository.
//!
//! The builder resolves everything it needs from the four bound types once
//! and copies it into [`Bindings`]. After that the record is read-only: its
//! fields are private, it is shared behind an `Arc`, and [`Bindings::assign`]
//! rejects every write with [`RepoError::FrozenBinding`].

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::{RepoError, RepoResult};

/// One of the four types a repository is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSlot {
    Entity,
    Domain,
    Create,
    Patch,
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entity => "entity",
            Self::Domain => "domain",
            Self::Create => "create",
            Self::Patch => "patch",
        })
    }
}

/// A bound type and the attribute names it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    type_name: &'static str,
    fields: Vec<String>,
}

impl TypeBinding {
    pub fn new<I, S>(type_name: &'static str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Binding for a Rust type, named after `std::any::type_name`.
    pub fn of<T: ?Sized>(fields: &[&str]) -> Self {
        Self::new(std::any::type_name::<T>(), fields.iter().copied())
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub(crate) fn field_set(&self) -> BTreeSet<&str> {
        self.fields.iter().map(String::as_str).collect()
    }
}

/// The sealed configuration of a built repository.
#[derive(Debug)]
pub struct Bindings {
    resource: String,
    entity: TypeBinding,
    domain: TypeBinding,
    create: TypeBinding,
    patch: TypeBinding,
    primary_key: String,
    max_page_size: Option<u64>,
}

impl Bindings {
    pub(crate) fn seal(
        resource: String,
        [entity, domain, create, patch]: [TypeBinding; 4],
        primary_key: String,
        max_page_size: Option<u64>,
    ) -> Self {
        Self {
            resource,
            entity,
            domain,
            create,
            patch,
            primary_key,
            max_page_size,
        }
    }

    /// Name used for this repository in errors and logs.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn entity(&self) -> &TypeBinding {
        &self.entity
    }

    #[must_use]
    pub fn domain(&self) -> &TypeBinding {
        &self.domain
    }

    #[must_use]
    pub fn create(&self) -> &TypeBinding {
        &self.create
    }

    #[must_use]
    pub fn patch(&self) -> &TypeBinding {
        &self.patch
    }

    #[must_use]
    pub fn get(&self, slot: BindingSlot) -> &TypeBinding {
        match slot {
            BindingSlot::Entity => &self.entity,
            BindingSlot::Domain => &self.domain,
            BindingSlot::Create => &self.create,
            BindingSlot::Patch => &self.patch,
        }
    }

    /// Column used when an operation is not given a lookup column.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[must_use]
    pub fn max_page_size(&self) -> Option<u64> {
        self.max_page_size
    }

    /// Attempts to rebind `slot`.
    ///
    /// Bindings are sealed when the builder returns, so this always fails with
    /// [`RepoError::FrozenBinding`] and the stored binding stays as it was.
    pub fn assign(&self, slot: BindingSlot, binding: TypeBinding) -> RepoResult<()> {
        let bound = self.get(slot).type_name();
        tracing::warn!(
            resource = %self.resource,
            %slot,
            bound,
            attempted = binding.type_name(),
            "rejected assignment to a sealed binding"
        );
        Err(RepoError::FrozenBinding {
            slot,
            bound: bound.to_string(),
        })
    }
}

/// Compares the entity's columns with the domain's fields.
pub(crate) fn check_same_shape(entity: &TypeBinding, domain: &TypeBinding) -> RepoResult<()> {
    let entity_fields = entity.field_set();
    let domain_fields = domain.field_set();
    if entity_fields == domain_fields {
        return Ok(());
    }
    Err(RepoError::AttributeMismatch {
        entity: entity.type_name().to_string(),
        domain: domain.type_name().to_string(),
        entity_only: entity_fields
            .difference(&domain_fields)
            .map(ToString::to_string)
            .collect(),
        domain_only: domain_fields
            .difference(&entity_fields)
            .map(ToString::to_string)
            .collect(),
    })
}

/// Input types may name fewer fields than the entity, but never unknown ones.
pub(crate) fn check_subset(entity: &TypeBinding, input: &TypeBinding) -> RepoResult<()> {
    let entity_fields = entity.field_set();
    let unknown: Vec<String> = input
        .field_set()
        .difference(&entity_fields)
        .map(ToString::to_string)
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(RepoError::AttributeMismatch {
        entity: entity.type_name().to_string(),
        domain: input.type_name().to_string(),
        entity_only: Vec::new(),
        domain_only: unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed() -> Bindings {
        Bindings::seal(
            "users".to_string(),
            [
                TypeBinding::new("users", ["id", "name", "email"]),
                TypeBinding::new("User", ["id", "name", "email"]),
                TypeBinding::new("NewUser", ["name", "email"]),
                TypeBinding::new("UserPatch", ["name"]),
            ],
            "id".to_string(),
            Some(50),
        )
    }

    #[test]
    fn test_same_shape_ignores_order() {
        let entity = TypeBinding::new("users", ["id", "name", "email"]);
        let domain = TypeBinding::new("User", ["email", "id", "name"]);
        assert!(check_same_shape(&entity, &domain).is_ok());
    }

    #[test]
    fn test_shape_mismatch_names_both_sides() {
        let entity = TypeBinding::new("users", ["id", "name", "created_at"]);
        let domain = TypeBinding::new("User", ["id", "name", "nickname"]);
        match check_same_shape(&entity, &domain) {
            Err(RepoError::AttributeMismatch {
                entity_only,
                domain_only,
                ..
            }) => {
                assert_eq!(entity_only, vec!["created_at"]);
                assert_eq!(domain_only, vec!["nickname"]);
            }
            other => panic!("expected AttributeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_subset_rejects_unknown_input_fields() {
        let entity = TypeBinding::new("users", ["id", "name"]);
        assert!(check_subset(&entity, &TypeBinding::new("NewUser", ["name"])).is_ok());
        assert!(check_subset(&entity, &TypeBinding::new("Empty", Vec::<String>::new())).is_ok());

        let err = check_subset(&entity, &TypeBinding::new("NewUser", ["name", "nmae"]))
            .unwrap_err();
        assert!(err.to_string().contains("nmae"), "{err}");
    }

    #[test]
    fn test_assign_is_rejected_and_binding_unchanged() {
        let bindings = sealed();
        for slot in [
            BindingSlot::Entity,
            BindingSlot::Domain,
            BindingSlot::Create,
            BindingSlot::Patch,
        ] {
            let before = bindings.get(slot).clone();
            let err = bindings
                .assign(slot, TypeBinding::new("Other", ["x"]))
                .unwrap_err();
            assert!(matches!(err, RepoError::FrozenBinding { slot: s, .. } if s == slot));
            assert_eq!(bindings.get(slot), &before);
        }
    }

    #[test]
    fn test_accessors() {
        let bindings = sealed();
        assert_eq!(bindings.resource(), "users");
        assert_eq!(bindings.primary_key(), "id");
        assert_eq!(bindings.max_page_size(), Some(50));
        assert_eq!(bindings.domain().type_name(), "User");
        assert_eq!(bindings.patch().fields(), ["name"]);
    }
}

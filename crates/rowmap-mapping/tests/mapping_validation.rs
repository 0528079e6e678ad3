use std::sync::Arc;

use pretty_assertions::assert_eq;
use rowmap_mapping::{Collection, Column, EntityMapping, MappingBuilder, MappingError};
use rstest::rstest;

fn shared(mapping: EntityMapping) -> Arc<EntityMapping> {
    Arc::new(mapping)
}

fn names(columns: &[Arc<str>]) -> Vec<&str> {
    columns.iter().map(AsRef::as_ref).collect()
}

type Build = fn() -> Result<EntityMapping, MappingError>;

fn ticket_with_anonymous_notes() -> Result<EntityMapping, MappingError> {
    let note = shared(MappingBuilder::new("Note").column("text").build()?);
    MappingBuilder::new("Ticket")
        .id("ticketId")
        .list("notes", note)
        .build()
}

fn user_with_anonymous_profile() -> Result<EntityMapping, MappingError> {
    let profile = shared(MappingBuilder::new("Profile").column("bio").build()?);
    MappingBuilder::new("User")
        .id("userId")
        .to_one("profile", profile)
        .build()
}

fn user_with_name_twice() -> Result<EntityMapping, MappingError> {
    MappingBuilder::new("User")
        .id("userId")
        .column("name")
        .simple(Column::new("name").named("full_name"))
        .build()
}

fn doc_with_created_at_twice() -> Result<EntityMapping, MappingError> {
    let audit = shared(MappingBuilder::new("Audit").column("createdAt").build()?);
    MappingBuilder::new("Doc")
        .id("docId")
        .simple(Column::new("created").named("created_at"))
        .nested("audit", audit)
        .build()
}

fn shard_with_region_twice() -> Result<EntityMapping, MappingError> {
    let key = shared(
        MappingBuilder::new("Key")
            .simple(Column::new("region").identity())
            .build()?,
    );
    MappingBuilder::new("Shard")
        .nested("primary", Arc::clone(&key))
        .nested("replica", key)
        .build()
}

fn post_with_bag_of_tags() -> Result<EntityMapping, MappingError> {
    let tag = shared(MappingBuilder::new("Tag").id("tagId").build()?);
    MappingBuilder::new("Post")
        .id("postId")
        .collection(Collection::parse("tags", "bag", tag)?)
        .build()
}

#[rstest]
#[case::collection_element_without_identity(
    ticket_with_anonymous_notes,
    MappingError::MissingIdentity {
        entity: "Note".into(),
        usage: "the element of Ticket.notes".into(),
    }
)]
#[case::optional_to_one_without_identity(
    user_with_anonymous_profile,
    MappingError::MissingIdentity {
        entity: "Profile".into(),
        usage: "the optional to-one User.profile".into(),
    }
)]
#[case::duplicate_property(
    user_with_name_twice,
    MappingError::DuplicateProperty { entity: "User".into(), property: "name".into() }
)]
#[case::duplicate_column_across_nested_group(
    doc_with_created_at_twice,
    MappingError::DuplicateColumn { entity: "Doc".into(), column: "CREATED_AT".into() }
)]
#[case::duplicate_identity_through_embedded_group(
    shard_with_region_twice,
    MappingError::DuplicateIdentity { entity: "Shard".into(), column: "REGION".into() }
)]
#[case::unsupported_collection_kind(
    post_with_bag_of_tags,
    MappingError::UnsupportedCollection("bag".into())
)]
fn invalid_mappings_are_rejected(#[case] build: Build, #[case] expected: MappingError) {
    assert_eq!(build().unwrap_err(), expected);
}

#[test]
fn embedded_group_without_identity_is_fine() {
    let address = shared(MappingBuilder::new("Address").column("street").build().unwrap());
    let user = MappingBuilder::new("User")
        .id("userId")
        .nested("address", address)
        .build()
        .unwrap();
    assert_eq!(names(user.identity_columns()), vec!["USER_ID"]);
    assert!(!user.is_flat());
    assert!(!user.has_collections());
}

#[test]
fn identity_flattens_embedded_but_not_optional_groups() {
    let tenant = shared(
        MappingBuilder::new("TenantKey")
            .simple(Column::new("tenant").identity())
            .build()
            .unwrap(),
    );
    let owner = shared(MappingBuilder::new("Owner").id("ownerId").build().unwrap());
    let account = MappingBuilder::new("Account")
        .nested("key", tenant)
        .id("accountNo")
        .to_one("owner", owner)
        .build()
        .unwrap();
    assert_eq!(names(account.identity_columns()), vec!["TENANT", "ACCOUNT_NO"]);
}

#[test]
fn collection_paths_run_through_nested_groups() {
    let item = shared(MappingBuilder::new("Item").id("itemId").build().unwrap());
    let tag = shared(MappingBuilder::new("Tag").id("tagId").build().unwrap());
    let cart = shared(
        MappingBuilder::new("Cart")
            .id("cartId")
            .list("items", item)
            .build()
            .unwrap(),
    );
    let customer = MappingBuilder::new("Customer")
        .id("customerId")
        .set("tags", tag)
        .to_one("cart", cart)
        .build()
        .unwrap();

    let slots: Vec<(Vec<usize>, &str)> = customer
        .collection_bindings()
        .iter()
        .map(|slot| (slot.path.clone(), slot.binding.property.as_ref()))
        .collect();
    assert_eq!(slots, vec![(vec![1], "tags"), (vec![2, 1], "items")]);
}

#[test]
fn column_lookup_ignores_case() {
    let user = MappingBuilder::new("User")
        .id("userId")
        .column("name")
        .build()
        .unwrap();
    let (index, binding) = user.simple_by_column("user_id").unwrap();
    assert_eq!(index, 0);
    assert_eq!(binding.property.as_ref(), "userId");
    assert!(user.simple_by_column("missing").is_none());
}

//! Integration tests for the owner-scoped reference accessors.

use anyhow::Result;
use replykit::reference::{
    add_manual, add_precedent, add_product, add_scenario, delete_manual, delete_precedent,
    delete_scenario, list_manuals, list_precedents, list_scenarios,
};
use replykit::types::ReferenceSets;
use replykit::PromptError;
use replykit_test_utils::TestSetup;

const OWNER_A: &str = "owner-a";
const OWNER_B: &str = "owner-b";

#[tokio::test]
async fn manuals_are_isolated_per_owner() -> Result<()> {
    let setup = TestSetup::new().await?;

    add_manual(&setup.db, OWNER_A, "always greet by name").await?;
    add_manual(&setup.db, OWNER_B, "reply within one hour").await?;

    let a = list_manuals(&setup.db, OWNER_A).await?;
    let b = list_manuals(&setup.db, OWNER_B).await?;

    assert_eq!(a.len(), 1);
    assert_eq!(a[0].content, "always greet by name");
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].content, "reply within one hour");
    Ok(())
}

#[tokio::test]
async fn delete_is_scoped_to_the_owner() -> Result<()> {
    let setup = TestSetup::new().await?;

    let manual = add_manual(&setup.db, OWNER_A, "no refunds after 30 days").await?;

    // A foreign owner cannot delete the record.
    let removed = delete_manual(&setup.db, OWNER_B, &manual.id).await?;
    assert!(!removed);
    assert_eq!(list_manuals(&setup.db, OWNER_A).await?.len(), 1);

    // The owner can.
    let removed = delete_manual(&setup.db, OWNER_A, &manual.id).await?;
    assert!(removed);
    assert!(list_manuals(&setup.db, OWNER_A).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_an_unknown_id_is_a_no_op() -> Result<()> {
    let setup = TestSetup::new().await?;
    assert!(!delete_scenario(&setup.db, OWNER_A, "no-such-id").await?);
    assert!(!delete_precedent(&setup.db, OWNER_A, "no-such-id").await?);
    Ok(())
}

#[tokio::test]
async fn scenario_requires_title_and_prompt() -> Result<()> {
    let setup = TestSetup::new().await?;

    let err = add_scenario(&setup.db, OWNER_A, "  ", "apologize first")
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::MissingField("title")));

    let err = add_scenario(&setup.db, OWNER_A, "Refund", "")
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::MissingField("prompt")));

    assert!(list_scenarios(&setup.db, OWNER_A).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn precedent_requires_both_inquiry_and_response() -> Result<()> {
    let setup = TestSetup::new().await?;

    let err = add_precedent(&setup.db, OWNER_A, "", "We ship worldwide.")
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::MissingField("inquiry")));

    let err = add_precedent(&setup.db, OWNER_A, "Do you ship to Japan?", "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::MissingField("response")));

    let precedent =
        add_precedent(&setup.db, OWNER_A, "Do you ship to Japan?", "We ship worldwide.").await?;
    assert_eq!(precedent.inquiry, "Do you ship to Japan?");
    assert_eq!(precedent.response, "We ship worldwide.");
    assert_eq!(list_precedents(&setup.db, OWNER_A).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn fetch_loads_all_four_sets_for_one_owner() -> Result<()> {
    let setup = TestSetup::new().await?;

    add_manual(&setup.db, OWNER_A, "sign off politely").await?;
    add_product(&setup.db, OWNER_A, "Widget Pro, 2-year warranty").await?;
    add_scenario(&setup.db, OWNER_A, "Refund", "apologize and offer store credit").await?;
    add_precedent(&setup.db, OWNER_A, "Is shipping free?", "Yes, over $50.").await?;

    // Another owner's data must not leak into the fetch.
    add_manual(&setup.db, OWNER_B, "other tenant rule").await?;

    let sets = ReferenceSets::fetch(&setup.db, OWNER_A).await?;
    assert_eq!(sets.manuals.len(), 1);
    assert_eq!(sets.products.len(), 1);
    assert_eq!(sets.scenarios.len(), 1);
    assert_eq!(sets.precedents.len(), 1);
    assert_eq!(sets.manuals[0].content, "sign off politely");
    Ok(())
}

#[tokio::test]
async fn fetch_for_an_empty_owner_returns_empty_sets() -> Result<()> {
    let setup = TestSetup::new().await?;
    let sets = ReferenceSets::fetch(&setup.db, "nobody").await?;
    assert!(sets.manuals.is_empty());
    assert!(sets.products.is_empty());
    assert!(sets.scenarios.is_empty());
    assert!(sets.precedents.is_empty());
    Ok(())
}

use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use ptbook_api::middleware::error_handling::AppError;
use ptbook_core::collaborators::MemberDirectory;
use ptbook_core::errors::ScheduleError;
use ptbook_core::models::schedule::Subject;

use crate::test_utils::TestContext;

// Mirrors the handler's write-time subject resolution against the directory
// collaborator: a registered member must be an active client and gets the
// directory name; a walk-in needs an explicit display name.
async fn resolve_subject_wrapper(
    ctx: &TestContext,
    trainer_id: Uuid,
    member_id: Option<Uuid>,
    display_name: Option<String>,
) -> Result<Subject, AppError> {
    match member_id {
        Some(member_id) => {
            if !ctx.directory.is_active_pair(trainer_id, member_id).await? {
                return Err(AppError(ScheduleError::Validation(format!(
                    "member {member_id} is not an active client of this trainer"
                ))));
            }
            let display_name = ctx.directory.resolve_display_name(member_id).await?;
            Ok(Subject::Registered { member_id, display_name })
        }
        None => {
            let display_name = display_name.filter(|n| !n.trim().is_empty()).ok_or_else(|| {
                AppError(ScheduleError::Validation(
                    "either member_id or display_name is required".to_string(),
                ))
            })?;
            Ok(Subject::Adhoc { display_name })
        }
    }
}

#[tokio::test]
async fn registered_member_gets_the_directory_name() {
    let mut ctx = TestContext::new();
    let trainer_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();

    ctx.directory
        .expect_is_active_pair()
        .with(predicate::eq(trainer_id), predicate::eq(member_id))
        .returning(|_, _| Ok(true));
    ctx.directory
        .expect_resolve_display_name()
        .with(predicate::eq(member_id))
        .returning(|_| Ok("Lee Haneul".to_string()));

    let subject = resolve_subject_wrapper(&ctx, trainer_id, Some(member_id), None)
        .await
        .unwrap();

    assert_eq!(
        subject,
        Subject::Registered { member_id, display_name: "Lee Haneul".to_string() }
    );
}

#[tokio::test]
async fn inactive_pair_is_rejected() {
    let mut ctx = TestContext::new();
    let trainer_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();

    ctx.directory
        .expect_is_active_pair()
        .returning(|_, _| Ok(false));
    // the directory must not be asked for a name
    ctx.directory.expect_resolve_display_name().times(0);

    let result = resolve_subject_wrapper(&ctx, trainer_id, Some(member_id), None).await;

    match result.unwrap_err().0 {
        ScheduleError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {e:?}"),
    }
}

#[tokio::test]
async fn walk_in_booking_uses_the_free_text_name() {
    let ctx = TestContext::new();

    let subject =
        resolve_subject_wrapper(&ctx, Uuid::new_v4(), None, Some("walk-in guest".to_string()))
            .await
            .unwrap();

    assert_eq!(subject, Subject::Adhoc { display_name: "walk-in guest".to_string() });
}

#[tokio::test]
async fn missing_subject_is_a_validation_error() {
    let ctx = TestContext::new();

    let result = resolve_subject_wrapper(&ctx, Uuid::new_v4(), None, None).await;
    assert!(matches!(result.unwrap_err().0, ScheduleError::Validation(_)));

    let result =
        resolve_subject_wrapper(&ctx, Uuid::new_v4(), None, Some("   ".to_string())).await;
    assert!(matches!(result.unwrap_err().0, ScheduleError::Validation(_)));
}

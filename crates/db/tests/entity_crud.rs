//! Integration tests for the content hierarchy repositories.
//!
//! Exercises the repository layer against a real database:
//! - Create full hierarchy (path -> module -> resource -> quiz -> question)
//! - Cascade delete behaviour
//! - Unique constraint violations
//! - Resource upsert keyed by (module, url)
//! - Verification token lookup rules

use chrono::{Duration, Utc};
use sqlx::PgPool;
use waymark_db::models::module::CreateModule;
use waymark_db::models::path::CreatePath;
use waymark_db::models::question::CreateQuestion;
use waymark_db::models::quiz::CreateQuiz;
use waymark_db::models::resource::CreateResource;
use waymark_db::models::user::CreateUser;
use waymark_db::repositories::{
    ModuleRepo, PathRepo, QuestionRepo, QuizRepo, ResourceRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$test-hash".to_string(),
        name: None,
        verification_token: format!("token-{email}"),
        verification_token_expires_at: Utc::now() + Duration::hours(24),
    }
}

fn new_path(slug: &str, title: &str) -> CreatePath {
    CreatePath {
        slug: slug.to_string(),
        title: title.to_string(),
        description: None,
        is_published: true,
    }
}

fn new_module(path_id: i64, title: &str, order_index: i32) -> CreateModule {
    CreateModule {
        path_id,
        title: title.to_string(),
        description: None,
        order_index,
    }
}

fn new_resource(module_id: i64, title: &str, url: &str) -> CreateResource {
    CreateResource {
        module_id,
        title: title.to_string(),
        url: url.to_string(),
        resource_type: "DOC".to_string(),
        est_minutes: Some(20),
        is_free: false,
        source_domain: None,
    }
}

fn new_quiz(module_id: i64, title: &str) -> CreateQuiz {
    CreateQuiz {
        module_id,
        title: title.to_string(),
        description: None,
        question_count: 1,
        individual_price_cents: None,
    }
}

fn new_question(quiz_id: i64, text: &str, order_index: i32) -> CreateQuestion {
    CreateQuestion {
        quiz_id,
        question_text: text.to_string(),
        question_type: "MULTIPLE_CHOICE".to_string(),
        options: serde_json::json!(["a", "b", "c", "d"]),
        correct_answer: serde_json::json!(["b"]),
        explanation: None,
        order_index,
    }
}

// ---------------------------------------------------------------------------
// Test: Full hierarchy creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_full_hierarchy(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("rust-basics", "Rust Basics"))
        .await
        .unwrap();
    assert_eq!(path.slug, "rust-basics");
    assert!(path.is_published);

    let module = ModuleRepo::create(&pool, &new_module(path.id, "Ownership", 0))
        .await
        .unwrap();
    assert_eq!(module.path_id, path.id);
    assert_eq!(module.order_index, 0);

    let resource = ResourceRepo::create(
        &pool,
        &new_resource(module.id, "The Book", "https://example.com/book"),
    )
    .await
    .unwrap();
    assert_eq!(resource.module_id, module.id);
    assert_eq!(resource.resource_type, "DOC");

    let quiz = QuizRepo::create(&pool, &new_quiz(module.id, "Ownership Quiz"))
        .await
        .unwrap();
    assert_eq!(quiz.module_id, module.id);

    let question = QuestionRepo::create(&pool, &new_question(quiz.id, "What moves?", 0))
        .await
        .unwrap();
    assert_eq!(question.quiz_id, quiz.id);
    assert_eq!(question.correct_answer, serde_json::json!(["b"]));
}

// ---------------------------------------------------------------------------
// Test: Cascade delete path removes all children
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cascade_delete_path(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("doomed", "Doomed"))
        .await
        .unwrap();
    let module = ModuleRepo::create(&pool, &new_module(path.id, "M1", 0))
        .await
        .unwrap();
    ResourceRepo::create(&pool, &new_resource(module.id, "R1", "https://x.test/1"))
        .await
        .unwrap();
    let quiz = QuizRepo::create(&pool, &new_quiz(module.id, "Q")).await.unwrap();
    QuestionRepo::create(&pool, &new_question(quiz.id, "?", 0))
        .await
        .unwrap();

    sqlx::query("DELETE FROM paths WHERE id = $1")
        .bind(path.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(ModuleRepo::find_by_id(&pool, module.id)
        .await
        .unwrap()
        .is_none());
    assert!(ResourceRepo::list_by_module(&pool, module.id)
        .await
        .unwrap()
        .is_empty());
    assert!(QuizRepo::find_by_module(&pool, module.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: Unique constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_path_slug_rejected(pool: PgPool) {
    PathRepo::create(&pool, &new_path("unique-slug", "First"))
        .await
        .unwrap();
    let result = PathRepo::create(&pool, &new_path("unique-slug", "Second")).await;
    assert!(result.is_err(), "Duplicate path slug should fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_resource_url_in_module_rejected(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("p", "P")).await.unwrap();
    let module = ModuleRepo::create(&pool, &new_module(path.id, "M", 0))
        .await
        .unwrap();

    ResourceRepo::create(&pool, &new_resource(module.id, "A", "https://x.test/same"))
        .await
        .unwrap();
    let result =
        ResourceRepo::create(&pool, &new_resource(module.id, "B", "https://x.test/same")).await;
    assert!(result.is_err(), "Duplicate (module, url) should fail");

    // The same url under a different module is fine.
    let other = ModuleRepo::create(&pool, &new_module(path.id, "M2", 1))
        .await
        .unwrap();
    ResourceRepo::create(&pool, &new_resource(other.id, "C", "https://x.test/same"))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_quiz_per_module(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("p", "P")).await.unwrap();
    let module = ModuleRepo::create(&pool, &new_module(path.id, "M", 0))
        .await
        .unwrap();

    QuizRepo::create(&pool, &new_quiz(module.id, "First")).await.unwrap();
    let result = QuizRepo::create(&pool, &new_quiz(module.id, "Second")).await;
    assert!(result.is_err(), "A module can only carry one quiz");
}

// ---------------------------------------------------------------------------
// Test: Resource upsert keyed by (module, url)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_upsert_refreshes_existing(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("p", "P")).await.unwrap();
    let module = ModuleRepo::create(&pool, &new_module(path.id, "M", 0))
        .await
        .unwrap();

    let first = ResourceRepo::upsert(&pool, &new_resource(module.id, "Old", "https://x.test/r"))
        .await
        .unwrap();

    let mut updated = new_resource(module.id, "New Title", "https://x.test/r");
    updated.est_minutes = Some(45);
    let second = ResourceRepo::upsert(&pool, &updated).await.unwrap();

    assert_eq!(second.id, first.id, "Upsert should hit the existing row");
    assert_eq!(second.title, "New Title");
    assert_eq!(second.est_minutes, Some(45));

    let all = ResourceRepo::list_by_module(&pool, module.id).await.unwrap();
    assert_eq!(all.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: Ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_modules_and_questions_ordered(pool: PgPool) {
    let path = PathRepo::create(&pool, &new_path("ordered", "Ordered"))
        .await
        .unwrap();
    // Insert out of order; listing must sort by order_index.
    ModuleRepo::create(&pool, &new_module(path.id, "Second", 1))
        .await
        .unwrap();
    ModuleRepo::create(&pool, &new_module(path.id, "First", 0))
        .await
        .unwrap();

    let modules = ModuleRepo::list_by_path(&pool, path.id).await.unwrap();
    let titles: Vec<&str> = modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(ModuleRepo::count_by_path(&pool, path.id).await.unwrap(), 2);

    let quiz = QuizRepo::create(&pool, &new_quiz(modules[0].id, "Q"))
        .await
        .unwrap();
    QuestionRepo::create(&pool, &new_question(quiz.id, "later", 2))
        .await
        .unwrap();
    QuestionRepo::create(&pool, &new_question(quiz.id, "earlier", 1))
        .await
        .unwrap();

    let questions = QuestionRepo::list_by_quiz(&pool, quiz.id).await.unwrap();
    let texts: Vec<&str> = questions.iter().map(|q| q.question_text.as_str()).collect();
    assert_eq!(texts, vec!["earlier", "later"]);
}

// ---------------------------------------------------------------------------
// Test: Verification token lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_verification_token_lookup(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("verify@example.com"))
        .await
        .unwrap();
    assert!(!user.email_verified);

    let found = UserRepo::find_by_verification_token(&pool, "token-verify@example.com")
        .await
        .unwrap();
    assert_eq!(found.unwrap().id, user.id);

    // After verification the token is cleared and no longer matches.
    assert!(UserRepo::mark_email_verified(&pool, user.id).await.unwrap());
    let verified = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(verified.email_verified);
    assert!(verified.verification_token.is_none());
    assert!(
        UserRepo::find_by_verification_token(&pool, "token-verify@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_verification_token_not_found(pool: PgPool) {
    let mut input = new_user("stale@example.com");
    input.verification_token_expires_at = Utc::now() - Duration::hours(1);
    UserRepo::create(&pool, &input).await.unwrap();

    assert!(
        UserRepo::find_by_verification_token(&pool, "token-stale@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap();
    let mut second = new_user("dup@example.com");
    second.verification_token = "token-other".to_string();
    let result = UserRepo::create(&pool, &second).await;
    assert!(result.is_err(), "Duplicate email should fail");
}

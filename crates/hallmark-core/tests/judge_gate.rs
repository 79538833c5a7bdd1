use std::sync::Arc;

use hallmark_core::judge::SqlJudge;
use hallmark_core::model::Decision;
use hallmark_core::providers::llm::fake::FakeLlmClient;

#[tokio::test]
async fn destructive_statements_are_never_approved() {
    let sqls = [
        "DROP TABLE fct_transactions",
        "DELETE FROM fct_transactions WHERE acct_id = 'A_1'",
        "INSERT INTO dim_accounts VALUES ('x')",
        "UPDATE dim_accounts SET status = 'CLOSED'",
        "delete from fct_transactions",
    ];
    for sql in sqls {
        // No scripted replies: if the judge consulted the model this
        // would surface as a transport rejection instead.
        let client = Arc::new(FakeLlmClient::new());
        let judge = SqlJudge::new(client.clone());
        let judgment = judge.judge(sql, "any prompt at all").await;
        assert_eq!(judgment.decision, Decision::Rejected, "approved: {sql}");
        assert!(
            judgment.reason.contains("destructive statement"),
            "unexpected reason for {sql}: {}",
            judgment.reason
        );
        assert!(client.prompts().is_empty(), "model consulted for {sql}");
    }
}

#[tokio::test]
async fn destructive_scan_respects_word_boundaries() {
    let client = Arc::new(FakeLlmClient::scripted([
        r#"{"decision": "APPROVED", "reason": "plausible"}"#,
    ]));
    let judge = SqlJudge::new(client);
    // Column/value text containing keyword substrings is not destructive.
    let judgment = judge
        .judge(
            "SELECT COUNT(*) FROM updates_log WHERE status = 'UPDATED'",
            "count rows",
        )
        .await;
    assert_eq!(judgment.decision, Decision::Approved);
}

#[tokio::test]
async fn unparseable_response_fails_closed() {
    let client = Arc::new(FakeLlmClient::scripted([
        "This query looks totally fine to me!",
    ]));
    let judge = SqlJudge::new(client);
    let judgment = judge.judge("SELECT SUM(amount) FROM t", "total amount").await;
    assert_eq!(judgment.decision, Decision::Rejected);
    assert_eq!(judgment.reason, "Judge failed to parse response");
}

#[tokio::test]
async fn transport_failure_fails_closed() {
    // Exhausted queue doubles as a transport/quota error.
    let judge = SqlJudge::new(Arc::new(FakeLlmClient::new()));
    let judgment = judge.judge("SELECT 1", "anything").await;
    assert_eq!(judgment.decision, Decision::Rejected);
    assert!(judgment.reason.starts_with("judge request failed"));
}

#[tokio::test]
async fn plausible_sql_is_approved_with_reason() {
    let client = Arc::new(FakeLlmClient::scripted([
        "```json\n{\"decision\": \"APPROVED\", \"reason\": \"applies currency and refund logic\"}\n```",
    ]));
    let judge = SqlJudge::new(client.clone());
    let judgment = judge
        .judge(
            "SELECT SUM(CASE WHEN currency = 'EUR' THEN amount * 1.1 ELSE amount END) FROM t WHERE amount > 0",
            "total revenue",
        )
        .await;
    assert_eq!(judgment.decision, Decision::Approved);
    assert_eq!(judgment.reason, "applies currency and refund logic");

    // The rubric embeds both the candidate SQL and the originating request.
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("total revenue"));
    assert!(prompts[0].contains("CASE WHEN currency"));
}

#[tokio::test]
async fn rejection_from_model_is_respected() {
    let client = Arc::new(FakeLlmClient::scripted([
        r#"{"decision": "REJECTED", "reason": "sums raw amount, ignores refunds"}"#,
    ]));
    let judge = SqlJudge::new(client);
    let judgment = judge
        .judge("SELECT SUM(amount) FROM fct_transactions", "total revenue")
        .await;
    assert_eq!(judgment.decision, Decision::Rejected);
    assert_eq!(judgment.reason, "sums raw amount, ignores refunds");
}

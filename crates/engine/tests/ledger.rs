use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Currency, Engine, EngineError, ExpenseCmd, GroupCmd, GroupStore, MoneyCents, SplitKind,
    SplitValue, SqlStore,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine<SqlStore>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for email in ["alice@mail.com", "bob@mail.com", "carol@mail.com"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (email, password) VALUES (?, ?)",
            vec![email.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::new(SqlStore::new(db.clone()));
    (engine, db)
}

async fn trip_group(engine: &Engine<SqlStore>) -> String {
    let group = engine
        .new_group(
            "alice@mail.com",
            GroupCmd::new("Trip")
                .members(vec!["bob@mail.com".into(), "carol@mail.com".into()])
                .currency(Currency::Eur),
        )
        .await
        .unwrap();
    group.id.to_string()
}

fn balance_of<'a>(
    summary: &'a engine::GroupSummary,
    member: &str,
) -> &'a engine::MemberBalance {
    summary
        .members
        .iter()
        .find(|b| b.member == member)
        .expect("member missing from summary")
}

#[tokio::test]
async fn new_group_puts_admin_first_and_starts_open() {
    let (engine, _db) = engine_with_db().await;

    let group = engine
        .new_group(
            "alice@mail.com",
            GroupCmd::new("Flat")
                .members(vec!["bob@mail.com".into(), "alice@mail.com".into()])
                .currency(Currency::Eur),
        )
        .await
        .unwrap();

    assert_eq!(group.admin, "alice@mail.com");
    assert_eq!(group.members, vec!["alice@mail.com", "bob@mail.com"]);
    assert!(!group.checkpoint.is_paid);
    assert_eq!(group.checkpoint.settled_at, None);
    assert_eq!(group.checkpoint.currency, Currency::Eur);
}

#[tokio::test]
async fn equal_expense_distributes_remainder_to_first_member() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    let expense = engine
        .new_expense(
            &group_id,
            "alice@mail.com",
            ExpenseCmd::equal("Dinner", 10.00),
        )
        .await
        .unwrap();

    assert_eq!(expense.amount, MoneyCents::new(1000));
    assert_eq!(expense.kind, SplitKind::Equal);
    let shares: Vec<i64> = expense.splits.iter().map(|s| s.amount.cents()).collect();
    assert_eq!(shares, vec![334, 333, 333]);
    assert_eq!(expense.splits[0].member, "alice@mail.com");
    let sum: i64 = shares.iter().sum();
    assert_eq!(sum, 1000);

    // The group was already open, so the checkpoint is left alone.
    let group = engine
        .group_details(&group_id, "alice@mail.com")
        .await
        .unwrap();
    assert!(!group.checkpoint.is_paid);
    assert_eq!(group.checkpoint.settled_at, None);
    assert_eq!(group.checkpoint.amount, MoneyCents::ZERO);
    assert_eq!(group.checkpoint.currency, Currency::Eur);
}

#[tokio::test]
async fn summary_folds_paid_owes_and_net() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    engine
        .new_expense(
            &group_id,
            "alice@mail.com",
            ExpenseCmd::equal("Hotel", 90.00),
        )
        .await
        .unwrap();

    let summary = engine.summary(&group_id, "bob@mail.com").await.unwrap();
    assert_eq!(summary.total_expenses, MoneyCents::new(9000));
    assert_eq!(summary.currency, Currency::Eur);
    assert_eq!(summary.last_settled, None);

    let alice = balance_of(&summary, "alice@mail.com");
    assert_eq!(alice.paid, MoneyCents::new(9000));
    assert_eq!(alice.owes, MoneyCents::new(3000));
    assert_eq!(alice.net_balance, MoneyCents::new(6000));

    let bob = balance_of(&summary, "bob@mail.com");
    assert_eq!(bob.paid, MoneyCents::ZERO);
    assert_eq!(bob.net_balance, MoneyCents::new(-3000));

    let carol = balance_of(&summary, "carol@mail.com");
    assert_eq!(carol.net_balance, MoneyCents::new(-3000));
}

#[tokio::test]
async fn settle_zeroes_the_window_and_audit_reports_it() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    engine
        .new_expense(&group_id, "alice@mail.com", ExpenseCmd::equal("Gas", 45.00))
        .await
        .unwrap();

    assert_eq!(engine.last_settled(&group_id, "alice@mail.com").await.unwrap(), None);

    let settled = engine.settle(&group_id, "alice@mail.com").await.unwrap();
    assert!(settled.checkpoint.is_paid);
    assert_eq!(settled.checkpoint.amount, MoneyCents::ZERO);
    assert!(settled.checkpoint.settled_at.is_some());

    let summary = engine.summary(&group_id, "alice@mail.com").await.unwrap();
    assert_eq!(summary.total_expenses, MoneyCents::ZERO);
    for balance in &summary.members {
        assert_eq!(balance.net_balance, MoneyCents::ZERO);
    }

    let audit = engine.last_settled(&group_id, "alice@mail.com").await.unwrap();
    assert_eq!(audit, settled.checkpoint.settled_at);

    // History is untouched, only the window moved.
    let transactions = engine
        .transactions(&group_id, "alice@mail.com")
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
}

#[tokio::test]
async fn expense_on_settled_group_reopens_it() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    engine.settle(&group_id, "alice@mail.com").await.unwrap();
    let settled_at = engine
        .group_details(&group_id, "alice@mail.com")
        .await
        .unwrap()
        .checkpoint
        .settled_at;

    engine
        .new_expense(&group_id, "bob@mail.com", ExpenseCmd::equal("Taxi", 12.00))
        .await
        .unwrap();

    let group = engine
        .group_details(&group_id, "alice@mail.com")
        .await
        .unwrap();
    assert!(!group.checkpoint.is_paid);
    // Reopening flips the flag without moving the checkpoint.
    assert_eq!(group.checkpoint.settled_at, settled_at);

    let summary = engine.summary(&group_id, "alice@mail.com").await.unwrap();
    assert_eq!(summary.total_expenses, MoneyCents::new(1200));
}

#[tokio::test]
async fn removed_member_still_appears_in_summary() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    engine
        .new_expense(
            &group_id,
            "carol@mail.com",
            ExpenseCmd::equal("Tickets", 30.00),
        )
        .await
        .unwrap();
    engine
        .remove_members(
            &group_id,
            "alice@mail.com",
            vec!["carol@mail.com".into()],
        )
        .await
        .unwrap();

    let summary = engine.summary(&group_id, "alice@mail.com").await.unwrap();
    assert_eq!(summary.members.len(), 3);
    // Current members come first, departed payers after.
    assert_eq!(summary.members[2].member, "carol@mail.com");
    assert_eq!(summary.members[2].paid, MoneyCents::new(3000));
    assert_eq!(summary.members[2].net_balance, MoneyCents::new(2000));
}

#[tokio::test]
async fn custom_split_must_sum_to_the_total() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    let expense = engine
        .new_expense(
            &group_id,
            "alice@mail.com",
            ExpenseCmd::custom(
                "Groceries",
                100.00,
                vec![
                    SplitValue {
                        member: "alice@mail.com".into(),
                        amount: 60.0,
                    },
                    SplitValue {
                        member: "bob@mail.com".into(),
                        amount: 40.0,
                    },
                ],
            ),
        )
        .await
        .unwrap();
    assert_eq!(expense.splits.len(), 2);
    assert_eq!(expense.splits[1].amount, MoneyCents::new(4000));

    let err = engine
        .new_expense(
            &group_id,
            "alice@mail.com",
            ExpenseCmd::custom(
                "Groceries",
                100.00,
                vec![
                    SplitValue {
                        member: "alice@mail.com".into(),
                        amount: 60.0,
                    },
                    SplitValue {
                        member: "bob@mail.com".into(),
                        amount: 40.01,
                    },
                ],
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SplitMismatch(_)));
}

#[tokio::test]
async fn transactions_come_back_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    for (title, amount) in [("First", 10.0), ("Second", 20.0), ("Third", 30.0)] {
        engine
            .new_expense(&group_id, "alice@mail.com", ExpenseCmd::equal(title, amount))
            .await
            .unwrap();
    }

    let transactions = engine
        .transactions(&group_id, "bob@mail.com")
        .await
        .unwrap();
    let titles: Vec<&str> = transactions.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
    assert!(transactions[0].created_at > transactions[2].created_at);
}

#[tokio::test]
async fn membership_gates_every_operation() {
    let (engine, _db) = engine_with_db().await;
    let group = engine
        .new_group("alice@mail.com", GroupCmd::new("Private"))
        .await
        .unwrap();
    let group_id = group.id.to_string();

    let err = engine
        .summary(&group_id, "bob@mail.com")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(group_id.clone()));

    let err = engine
        .new_expense(&group_id, "bob@mail.com", ExpenseCmd::equal("Sneaky", 5.0))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(group_id.clone()));

    // Same error, carrying the requested id, for a group that does not
    // exist at all.
    let err = engine
        .summary("no-such-group", "alice@mail.com")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("no-such-group".to_string()));
}

#[tokio::test]
async fn store_members_lists_ordered_membership() {
    let (engine, db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    let store = SqlStore::new(db);
    let members = store.members(&group_id).await.unwrap();
    assert_eq!(
        members,
        vec!["alice@mail.com", "bob@mail.com", "carol@mail.com"]
    );

    let err = store.members("missing").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("missing".to_string()));
}

#[tokio::test]
async fn admin_cannot_be_removed() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    let err = engine
        .remove_members(
            &group_id,
            "bob@mail.com",
            vec!["alice@mail.com".into()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMember(_)));

    let group = engine
        .group_details(&group_id, "alice@mail.com")
        .await
        .unwrap();
    assert!(group.members.contains(&"alice@mail.com".to_string()));
}

#[tokio::test]
async fn add_members_skips_ones_already_present() {
    let (engine, _db) = engine_with_db().await;
    let group_id = trip_group(&engine).await;

    let group = engine
        .add_members(
            &group_id,
            "alice@mail.com",
            vec!["bob@mail.com".into(), "dave@mail.com".into()],
        )
        .await
        .unwrap();
    assert_eq!(
        group.members,
        vec![
            "alice@mail.com",
            "bob@mail.com",
            "carol@mail.com",
            "dave@mail.com"
        ]
    );
}

#[tokio::test]
async fn groups_by_status_tracks_the_checkpoint() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_group(&engine).await;
    engine
        .new_group("bob@mail.com", GroupCmd::new("Flat"))
        .await
        .unwrap();

    engine.settle(&trip, "alice@mail.com").await.unwrap();

    let settled = engine.groups_by_status(true).await.unwrap();
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].name, "Trip");

    let open = engine.groups_by_status(false).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].name, "Flat");
}

#[tokio::test]
async fn my_groups_lists_only_memberships() {
    let (engine, _db) = engine_with_db().await;
    trip_group(&engine).await;
    engine
        .new_group("bob@mail.com", GroupCmd::new("Flat"))
        .await
        .unwrap();

    let alice = engine.my_groups("alice@mail.com").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].name, "Trip");

    let bob = engine.my_groups("bob@mail.com").await.unwrap();
    assert_eq!(bob.len(), 2);
}

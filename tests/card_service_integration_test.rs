use chrono::{Duration, Utc};
use loyalty_cards::adapters::memory::MemoryStore;
use loyalty_cards::adapters::mock::{CustomerDirectory, RewardCatalog};
use loyalty_cards::application::cards::{
    CardApplicationError, CardLockRegistry, ServiceDependencies, add_points, adjust_points,
    card_stats, change_card_status, create_card, delete_card, get_card, get_card_by_customer,
    list_cards, point_history, redeem_points, update_card,
};
use loyalty_cards::domain::card::{CardPatch, CardStatus, MembershipCard, Tier};
use loyalty_cards::domain::commands::*;
use loyalty_cards::domain::tier::TierSchedule;
use loyalty_cards::domain::value_objects::*;
use loyalty_cards::ports::card_repository::{CardFilter, CardRepository, PageRequest};
use loyalty_cards::ports::reward_catalog::Reward;
use std::sync::Arc;

// ============================================================================
// テスト用のセットアップヘルパー
// ============================================================================

/// インメモリアダプターで依存関係を組み立てる
///
/// MemoryStoreはCardRepositoryとLedgerStoreの両方を実装するため、
/// 同じインスタンスを両ポートとして注入する。
fn build_deps() -> (
    ServiceDependencies,
    Arc<MemoryStore>,
    Arc<CustomerDirectory>,
    Arc<RewardCatalog>,
) {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(CustomerDirectory::new());
    let catalog = Arc::new(RewardCatalog::new());

    let deps = ServiceDependencies {
        card_repository: store.clone(),
        ledger_store: store.clone(),
        customer_directory: directory.clone(),
        reward_catalog: catalog.clone(),
        card_locks: Arc::new(CardLockRegistry::new()),
        tier_schedule: TierSchedule::default(),
    };

    (deps, store, directory, catalog)
}

/// テスト用カードを発行する
async fn issue_test_card(deps: &ServiceDependencies) -> MembershipCard {
    let now = Utc::now();
    let cmd = CreateCard {
        customer_id: CustomerId::new(),
        tier: Tier::Silver,
        issue_date: now,
        expire_date: now + Duration::days(730),
    };
    create_card(deps, cmd).await.unwrap()
}

/// テスト用の特典をカタログに登録する
fn seed_reward(catalog: &RewardCatalog, name: &str, points_cost: i64) -> RewardId {
    let id = RewardId::new();
    catalog.add_reward(Reward {
        id,
        name: name.to_string(),
        points_cost,
        description: format!("{} (test reward)", name),
    });
    id
}

// ============================================================================
// カードのライフサイクル
// ============================================================================

#[tokio::test]
async fn test_create_card_success() {
    // Arrange
    let (deps, store, _, _) = build_deps();

    let now = Utc::now();
    let customer_id = CustomerId::new();
    let cmd = CreateCard {
        customer_id,
        tier: Tier::Gold,
        issue_date: now,
        expire_date: now + Duration::days(365),
    };

    // Act: カード発行（純粋な関数呼び出し）
    let card = create_card(&deps, cmd).await.unwrap();

    // Assert: 新規カードはポイント0・利用額0・active
    assert_eq!(card.customer_id, customer_id);
    assert_eq!(card.tier, Tier::Gold);
    assert_eq!(card.status, CardStatus::Active);
    assert_eq!(card.points, 0);
    assert_eq!(card.total_spent, 0);

    // リポジトリに保存されたことを確認
    let loaded = store.get_by_id(card.id).await.unwrap();
    assert_eq!(loaded, Some(card));
}

#[tokio::test]
async fn test_create_card_duplicate_customer() {
    // Arrange: 同じ顧客で1枚目を発行済み
    let (deps, _, _, _) = build_deps();
    let first = issue_test_card(&deps).await;

    let now = Utc::now();
    let cmd = CreateCard {
        customer_id: first.customer_id,
        tier: Tier::Silver,
        issue_date: now,
        expire_date: now + Duration::days(365),
    };

    // Act: 2枚目の発行を試みる
    let result = create_card(&deps, cmd).await;

    // Assert: 1顧客1枚ルールで拒否
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::DuplicateCard
    ));
}

#[tokio::test]
async fn test_create_card_rejects_inverted_period() {
    // Arrange
    let (deps, _, _, _) = build_deps();

    let now = Utc::now();
    let cmd = CreateCard {
        customer_id: CustomerId::new(),
        tier: Tier::Silver,
        issue_date: now,
        expire_date: now - Duration::days(1),
    };

    // Act
    let result = create_card(&deps, cmd).await;

    // Assert: 有効期限が発行日以前なら検証エラー
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::Validation(_)
    ));
}

#[tokio::test]
async fn test_get_card_includes_directory_info() {
    // Arrange: 顧客ディレクトリに表示情報を登録
    let (deps, _, directory, _) = build_deps();
    let card = issue_test_card(&deps).await;
    directory.add_customer(card.customer_id, "Aiko Tanaka", "CUST-0042");

    // ゴールド下限の半分の利用額（シルバーの中間地点）にする
    let patch = CardPatch {
        total_spent: Some(7_500_000),
        ..Default::default()
    };
    update_card(
        &deps,
        UpdateCard {
            card_id: card.id,
            patch,
        },
    )
    .await
    .unwrap();

    // Act
    let detail = get_card(&deps, card.id).await.unwrap();

    // Assert: 表示情報とランク進捗（15,000,000に対して50%）が添えられる
    assert_eq!(detail.card.id, card.id);
    assert_eq!(detail.customer_name, Some("Aiko Tanaka".to_string()));
    assert_eq!(detail.customer_code, Some("CUST-0042".to_string()));
    assert_eq!(detail.suggested_tier, Tier::Silver);
    assert_eq!(detail.tier_progress, Some(50));
}

#[tokio::test]
async fn test_get_card_by_customer() {
    // Arrange
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    // Act
    let found = get_card_by_customer(&deps, card.customer_id).await.unwrap();

    // Assert
    assert_eq!(found.id, card.id);

    // 存在しない顧客はCardNotFound
    let missing = get_card_by_customer(&deps, CustomerId::new()).await;
    assert!(matches!(
        missing.unwrap_err(),
        CardApplicationError::CardNotFound
    ));
}

#[tokio::test]
async fn test_update_card_cannot_touch_points() {
    // Arrange: 残高500のカード
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;
    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 500,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: 属性更新（ランクと累計利用額のみ）
    let patch = CardPatch {
        tier: Some(Tier::Gold),
        total_spent: Some(20_000_000),
        ..Default::default()
    };
    let updated = update_card(
        &deps,
        UpdateCard {
            card_id: card.id,
            patch,
        },
    )
    .await
    .unwrap();

    // Assert: 残高は台帳経由でのみ変わる（更新では不変）
    assert_eq!(updated.points, 500);
    assert_eq!(updated.tier, Tier::Gold);
    assert_eq!(updated.total_spent, 20_000_000);

    // 推奨ランクと進捗は保存済みランク（ゴールド）基準で計算される
    let detail = get_card(&deps, card.id).await.unwrap();
    assert_eq!(detail.suggested_tier, Tier::Gold);
    assert_eq!(detail.tier_progress, Some(66)); // 20M / 30M
}

#[tokio::test]
async fn test_change_card_status_rejects_same_status() {
    // Arrange
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    // Act: activeからactiveへの変更
    let result = change_card_status(
        &deps,
        ChangeCardStatus {
            card_id: card.id,
            new_status: CardStatus::Active,
        },
    )
    .await;

    // Assert: 無効な遷移として拒否
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::InvalidTransition(CardStatus::Active)
    ));
}

#[tokio::test]
async fn test_delete_card_removes_history() {
    // Arrange: 取引履歴つきのカード
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;
    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 100,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act
    delete_card(&deps, card.id).await.unwrap();

    // Assert: カードも履歴も消える
    let result = get_card(&deps, card.id).await;
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::CardNotFound
    ));

    let history = point_history(&deps, card.id, PageRequest::default()).await;
    assert!(matches!(
        history.unwrap_err(),
        CardApplicationError::CardNotFound
    ));

    // 2回目の削除はCardNotFound
    let again = delete_card(&deps, card.id).await;
    assert!(matches!(
        again.unwrap_err(),
        CardApplicationError::CardNotFound
    ));
}

// ============================================================================
// ポイント台帳
// ============================================================================

#[tokio::test]
async fn test_add_points_accumulates_and_records_spend() {
    // Arrange
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    // Act: 宿泊利用でポイント加算
    let (updated, transaction) = add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 500,
            amount: Some(10_000),
            description: None,
        },
    )
    .await
    .unwrap();

    // Assert: 残高と累計利用額が増え、取引が記録される
    assert_eq!(updated.points, 500);
    assert_eq!(updated.total_spent, 10_000);
    assert_eq!(transaction.delta, 500);
    assert_eq!(transaction.amount, Some(10_000));
    assert_eq!(transaction.description, "Points earned");

    let history = point_history(&deps, card.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
    assert_eq!(history.transactions[0].id, transaction.id);
}

#[tokio::test]
async fn test_add_points_rejects_non_positive() {
    // Arrange
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    // Act & Assert: 0以下の加算は検証エラー
    for points in [0, -10] {
        let result = add_points(
            &deps,
            AddPoints {
                card_id: card.id,
                points,
                amount: None,
                description: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            CardApplicationError::Validation(_)
        ));
    }

    // 負の利用額も検証エラー
    let result = add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 100,
            amount: Some(-1),
            description: None,
        },
    )
    .await;
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::Validation(_)
    ));
}

#[tokio::test]
async fn test_adjust_points_can_go_down_but_not_negative() {
    // Arrange: 残高300
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;
    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 300,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: -100の調整は成功
    let (updated, transaction) = adjust_points(
        &deps,
        AdjustPoints {
            card_id: card.id,
            delta: -100,
            description: Some("Data correction".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.points, 200);
    assert_eq!(transaction.delta, -100);
    assert_eq!(transaction.description, "Data correction");

    // Assert: 残高を負にする調整は拒否
    let result = adjust_points(
        &deps,
        AdjustPoints {
            card_id: card.id,
            delta: -300,
            description: None,
        },
    )
    .await;
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::InvalidAdjustment {
            delta: -300,
            balance: 200
        }
    ));
}

#[tokio::test]
async fn test_earn_and_adjust_allowed_on_blocked_card() {
    // Arrange: ブロック済みのカード
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;
    change_card_status(
        &deps,
        ChangeCardStatus {
            card_id: card.id,
            new_status: CardStatus::Blocked,
        },
    )
    .await
    .unwrap();

    // Act & Assert: ステータスが制限するのは交換のみ。加算と調整は通る
    let (after_earn, _) = add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 100,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(after_earn.points, 100);

    let (after_adjust, _) = adjust_points(
        &deps,
        AdjustPoints {
            card_id: card.id,
            delta: -50,
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(after_adjust.points, 50);
}

#[tokio::test]
async fn test_point_history_newest_first_pagination() {
    // Arrange: 5件の取引
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    for i in 1..=5 {
        add_points(
            &deps,
            AddPoints {
                card_id: card.id,
                points: i * 10,
                amount: None,
                description: Some(format!("earn {}", i)),
            },
        )
        .await
        .unwrap();
    }

    // Act & Assert: 新しい順に2件ずつ
    let page1 = point_history(&deps, card.id, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page1.total, 5);
    assert_eq!(page1.transactions.len(), 2);
    assert_eq!(page1.transactions[0].description, "earn 5");
    assert_eq!(page1.transactions[1].description, "earn 4");

    let page3 = point_history(&deps, card.id, PageRequest::new(3, 2))
        .await
        .unwrap();
    assert_eq!(page3.transactions.len(), 1);
    assert_eq!(page3.transactions[0].description, "earn 1");

    // 書き込みがなければ同じページが返る
    let page1_again = point_history(&deps, card.id, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(
        page1.transactions[0].id,
        page1_again.transactions[0].id
    );
}

#[tokio::test]
async fn test_ledger_replay_matches_balance() {
    // Arrange: 加算・交換・調整が混在する履歴
    let (deps, _, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Dinner for two", 250);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 1000,
            amount: Some(50_000),
            description: None,
        },
    )
    .await
    .unwrap();
    redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 250,
            description: None,
        },
    )
    .await
    .unwrap();
    adjust_points(
        &deps,
        AdjustPoints {
            card_id: card.id,
            delta: -100,
            description: None,
        },
    )
    .await
    .unwrap();
    let (final_card, _) = add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 50,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: 台帳全体を取得してdeltaを畳み込む
    let history = point_history(&deps, card.id, PageRequest::new(1, 100))
        .await
        .unwrap();

    // Assert: 残高は常にdeltaの総和と一致する
    let replayed: i64 = history.transactions.iter().map(|tx| tx.delta).sum();
    assert_eq!(final_card.points, 700);
    assert_eq!(replayed, final_card.points);
    assert_eq!(history.total, 4);
}

// ============================================================================
// 特典交換
// ============================================================================

#[tokio::test]
async fn test_redeem_points_success() {
    // Arrange: 残高1000と特典カタログ
    let (deps, _, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Spa voucher", 400);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 1000,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act
    let (updated, transaction) = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 400,
            description: None,
        },
    )
    .await
    .unwrap();

    // Assert: 残高が減り、負のdeltaと既定の摘要が記録される
    assert_eq!(updated.points, 600);
    assert_eq!(transaction.delta, -400);
    assert_eq!(transaction.description, "Redeemed Spa voucher");
}

#[tokio::test]
async fn test_redeem_points_insufficient_balance() {
    // Arrange: 残高100
    let (deps, store, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Free night stay", 500);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 100,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: 残高を超える交換
    let result = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 500,
            description: None,
        },
    )
    .await;

    // Assert: 拒否され、残高は変わらない
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::InsufficientPoints {
            requested: 500,
            available: 100
        }
    ));
    let loaded = store.get_by_id(card.id).await.unwrap().unwrap();
    assert_eq!(loaded.points, 100);

    let history = point_history(&deps, card.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1); // 失敗した交換は台帳に残らない
}

#[tokio::test]
async fn test_redeem_exact_balance_boundary() {
    // Arrange: 残高500で500ポイントの特典
    let (deps, _, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Dinner for two", 500);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 500,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: ちょうど全額の交換は成功して残高0
    let (updated, _) = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 500,
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.points, 0);

    // Assert: 残高0からの交換は拒否
    let result = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 1,
            description: None,
        },
    )
    .await;
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::InsufficientPoints {
            requested: 1,
            available: 0
        }
    ));
}

#[tokio::test]
async fn test_redeem_points_requires_active_card() {
    // Arrange: 残高ありだがブロック済み
    let (deps, _, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Spa voucher", 100);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 1000,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();
    change_card_status(
        &deps,
        ChangeCardStatus {
            card_id: card.id,
            new_status: CardStatus::Blocked,
        },
    )
    .await
    .unwrap();

    // Act
    let result = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id,
            points: 100,
            description: None,
        },
    )
    .await;

    // Assert: activeでないカードは交換できず、残高も台帳も変わらない
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::CardNotActive(CardStatus::Blocked)
    ));

    let detail = get_card(&deps, card.id).await.unwrap();
    assert_eq!(detail.card.points, 1000);

    let history = point_history(&deps, card.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
}

#[tokio::test]
async fn test_redeem_points_unknown_reward() {
    // Arrange: カタログ未登録の特典ID
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 1000,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act
    let result = redeem_points(
        &deps,
        RedeemPoints {
            card_id: card.id,
            reward_id: RewardId::new(),
            points: 100,
            description: None,
        },
    )
    .await;

    // Assert
    assert!(matches!(
        result.unwrap_err(),
        CardApplicationError::RewardNotFound
    ));
}

// ============================================================================
// 一覧と統計
// ============================================================================

#[tokio::test]
async fn test_list_cards_filters_and_pages() {
    // Arrange: ランクの異なる3枚
    let (deps, _, _, _) = build_deps();
    let now = Utc::now();

    let mut ids = Vec::new();
    for tier in [Tier::Silver, Tier::Gold, Tier::Platinum] {
        let card = create_card(
            &deps,
            CreateCard {
                customer_id: CustomerId::new(),
                tier,
                issue_date: now,
                expire_date: now + Duration::days(365),
            },
        )
        .await
        .unwrap();
        ids.push(card.id);
    }

    // Act & Assert: ランクでの絞り込み
    let gold_only = list_cards(
        &deps,
        CardFilter {
            tier: Some(Tier::Gold),
            ..Default::default()
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(gold_only.total, 1);
    assert_eq!(gold_only.cards[0].tier, Tier::Gold);

    // カードID文字列の部分一致検索
    let needle = ids[0].value().to_string()[..8].to_string();
    let found = list_cards(
        &deps,
        CardFilter {
            search: Some(needle),
            ..Default::default()
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert!(found.cards.iter().any(|card| card.id == ids[0]));

    // ページング（totalはフィルタ適用後の全件数）
    let page = list_cards(&deps, CardFilter::default(), PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.cards.len(), 2);
}

#[tokio::test]
async fn test_card_stats_aggregates() {
    // Arrange: 2枚のカードと残高
    let (deps, _, _, _) = build_deps();
    let now = Utc::now();

    let silver = create_card(
        &deps,
        CreateCard {
            customer_id: CustomerId::new(),
            tier: Tier::Silver,
            issue_date: now,
            expire_date: now + Duration::days(365),
        },
    )
    .await
    .unwrap();
    let gold = create_card(
        &deps,
        CreateCard {
            customer_id: CustomerId::new(),
            tier: Tier::Gold,
            issue_date: now,
            expire_date: now + Duration::days(365),
        },
    )
    .await
    .unwrap();

    add_points(
        &deps,
        AddPoints {
            card_id: silver.id,
            points: 300,
            amount: Some(30_000),
            description: None,
        },
    )
    .await
    .unwrap();
    add_points(
        &deps,
        AddPoints {
            card_id: gold.id,
            points: 100,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();
    change_card_status(
        &deps,
        ChangeCardStatus {
            card_id: gold.id,
            new_status: CardStatus::Blocked,
        },
    )
    .await
    .unwrap();

    // Act
    let stats = card_stats(&deps).await.unwrap();

    // Assert
    assert_eq!(stats.total_cards, 2);
    assert_eq!(stats.by_tier.silver, 1);
    assert_eq!(stats.by_tier.gold, 1);
    assert_eq!(stats.by_tier.platinum, 0);
    assert_eq!(stats.by_status.active, 1);
    assert_eq!(stats.by_status.blocked, 1);
    assert_eq!(stats.total_points, 400);
    assert_eq!(stats.total_spent, 30_000);
    assert!((stats.average_points - 200.0).abs() < f64::EPSILON);
}

// ============================================================================
// 並行実行
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_earns_serialize() {
    // Arrange
    let (deps, _, _, _) = build_deps();
    let card = issue_test_card(&deps).await;

    // Act: 同じカードへ10並行で加算
    let mut handles = Vec::new();
    for _ in 0..10 {
        let deps = deps.clone();
        let card_id = card.id;
        handles.push(tokio::spawn(async move {
            add_points(
                &deps,
                AddPoints {
                    card_id,
                    points: 100,
                    amount: None,
                    description: None,
                },
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Assert: 全加算が直列化されて残高1000、履歴10件
    let detail = get_card(&deps, card.id).await.unwrap();
    assert_eq!(detail.card.points, 1000);

    let history = point_history(&deps, card.id, PageRequest::new(1, 100))
        .await
        .unwrap();
    assert_eq!(history.total, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeems_never_overdraw() {
    // Arrange: 残高500、100ポイントの特典
    let (deps, _, _, catalog) = build_deps();
    let card = issue_test_card(&deps).await;
    let reward_id = seed_reward(&catalog, "Spa voucher", 100);

    add_points(
        &deps,
        AddPoints {
            card_id: card.id,
            points: 500,
            amount: None,
            description: None,
        },
    )
    .await
    .unwrap();

    // Act: 10並行で100ポイントずつ交換を試みる
    let mut handles = Vec::new();
    for _ in 0..10 {
        let deps = deps.clone();
        let card_id = card.id;
        handles.push(tokio::spawn(async move {
            redeem_points(
                &deps,
                RedeemPoints {
                    card_id,
                    reward_id,
                    points: 100,
                    description: None,
                },
            )
            .await
        }));
    }

    let mut succeeded = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(CardApplicationError::InsufficientPoints { .. }) => insufficient += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    // Assert: ちょうど5件成功し、残高は0（負にはならない）
    assert_eq!(succeeded, 5);
    assert_eq!(insufficient, 5);

    let detail = get_card(&deps, card.id).await.unwrap();
    assert_eq!(detail.card.points, 0);

    // 台帳の畳み込みも残高と一致
    let history = point_history(&deps, card.id, PageRequest::new(1, 100))
        .await
        .unwrap();
    let replayed: i64 = history.transactions.iter().map(|tx| tx.delta).sum();
    assert_eq!(replayed, 0);
}

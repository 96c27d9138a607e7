use serde_json::{json, Value};
use warpay::report::assemble_war_report_at;
use warpay::rewards::{calculate_war_rewards, PayoutType, RewardSettings};
use warpay::torn::{FixtureTransport, TornApi};

const BASE: &str = "https://api.torn.com/v2/";

fn war_report(end: Value, include_opponent: bool) -> Value {
    let mut factions = vec![json!({
        "id": 1,
        "name": "Home",
        "score": 120.0,
        "attacks": 100,
        "members": [
            { "id": 11, "name": "alpha", "level": 80, "attacks": 10, "score": 40.0 },
            { "id": 12, "name": "bravo", "level": 70, "attacks": 0, "score": 0.0 },
            { "id": 13, "name": "charlie", "level": 60, "attacks": 5, "score": 20.0 },
            { "id": 14, "name": "delta", "level": 50, "attacks": 0, "score": 0.0 }
        ]
    })];
    if include_opponent {
        factions.push(json!({ "id": 2, "name": "Away", "score": 90.0, "attacks": 80, "members": [] }));
    }
    json!({ "rankedwarreport": { "id": 55, "start": 1000, "end": end, "factions": factions } })
}

fn party(id: u64, faction_id: u64) -> Value {
    json!({ "id": id, "faction_id": faction_id })
}

fn fixture(end: Value, include_opponent: bool) -> FixtureTransport {
    FixtureTransport::new()
        .with_response("faction/basic", json!({ "basic": { "id": 1, "name": "Home" } }))
        .with_response(
            "faction/1/rankedwars",
            json!({ "rankedwars": [{ "id": 55, "start": 1000, "end": 2000 }] }),
        )
        .with_response("faction/55/rankedwarreport", war_report(end, include_opponent))
        .with_response(
            "faction/chains",
            json!({ "chains": [{ "id": 501 }, { "id": 502 }] }),
        )
        .with_response(
            "faction/501/chainreport",
            json!({ "chainreport": {
                "id": 501,
                "bonuses": [{ "attacker_id": 11, "defender_id": 90, "chain": 10, "respect": 5.0 }],
                "attackers": [{ "id": 11, "attacks": { "total": 12, "assists": 1 } }]
            }}),
        )
        .with_response(
            "faction/502/chainreport",
            json!({ "chainreport": {
                "id": 502,
                "bonuses": [{ "attacker_id": 11, "defender_id": 91, "chain": 25, "respect": 15.0 }],
                "attackers": [{ "id": 12, "attacks": { "total": 3, "assists": 2 } }]
            }}),
        )
        .with_response(
            "faction/attacksfull",
            json!({
                "attacks": [
                    { "id": 1, "attacker": party(201, 2), "defender": party(12, 1), "result": "Hospitalized" },
                    { "id": 2, "attacker": party(301, 3), "defender": party(12, 1), "result": "Hospitalized" }
                ],
                "_metadata": { "links": {
                    "next": "https://api.torn.com/v2/faction/attacksfull?filters=incoming&limit=1000&sort=ASC&from=1500&to=2000"
                }}
            }),
        )
        .with_response(
            "faction/attacksfull?filters=incoming&limit=1000&sort=ASC&from=1500&to=2000",
            json!({
                "attacks": [
                    { "id": 3, "attacker": party(202, 2), "defender": party(13, 1), "result": "Mugged" }
                ],
                "_metadata": { "links": { "next": null } }
            }),
        )
        .with_response(
            "faction/revivesFull",
            json!({
                "revives": [
                    { "id": 1, "reviver": party(13, 1), "target": party(12, 1), "timestamp": 1600 },
                    { "id": 2, "reviver": party(400, 9), "target": party(11, 1), "timestamp": 1700 }
                ]
            }),
        )
}

#[tokio::test]
async fn assembles_consistent_war_report() {
    let transport = fixture(json!(2000), true);
    let api = TornApi::with_transport(transport.clone(), "key", BASE);

    let report = assemble_war_report_at(&api, 9999)
        .await
        .expect("assembly should succeed")
        .expect("war data should be present");

    assert_eq!(report.war_id, 55);
    assert_eq!(report.faction_name, "Home");
    assert_eq!(report.opponent_name, "Away");
    assert_eq!((report.start, report.end), (1000, 2000));
    assert_eq!(report.total_attacks, 100);
    assert_eq!(report.total_respect, 120.0);

    assert_eq!(report.chain_reports[&11].bonus, 5.0);
    assert_eq!(report.chain_reports[&11].assists, 1);
    assert_eq!(report.chain_reports[&12].assists, 2);
    assert_eq!(report.total_bonus_respect, 5.0);
    assert_eq!(report.total_assists, 3);

    assert_eq!(report.med_outs.get(&12), Some(&1));
    assert_eq!(report.med_outs.get(&13), Some(&1));
    assert_eq!(report.total_med_outs, 2);
    assert_eq!(report.revives.get(&13), Some(&1));
    assert_eq!(report.total_revives, 1);

    assert!(transport
        .requests()
        .contains(&"https://api.torn.com/v2/faction/chains?limit=100&sort=ASC&from=1000&to=2000".to_string()));
}

#[tokio::test]
async fn open_war_is_aggregated_up_to_now() {
    let transport = fixture(Value::Null, true);
    let api = TornApi::with_transport(transport.clone(), "key", BASE);

    let report = assemble_war_report_at(&api, 5000)
        .await
        .expect("assembly should succeed")
        .expect("war data should be present");

    assert_eq!(report.end, 5000);
    assert!(transport.requests().iter().any(|url| url.contains("faction/chains") && url.ends_with("to=5000")));
}

#[tokio::test]
async fn missing_opponent_short_circuits() {
    let api = TornApi::with_transport(fixture(json!(2000), false), "key", BASE);
    let report = assemble_war_report_at(&api, 9999).await.expect("no failure");
    assert!(report.is_none());
}

#[tokio::test]
async fn faction_without_concluded_war_has_no_report() {
    let transport = FixtureTransport::new()
        .with_response("faction/basic", json!({ "basic": { "id": 1, "name": "Home" } }))
        .with_response(
            "faction/1/rankedwars",
            json!({ "rankedwars": [{ "id": 60, "start": 1000, "end": null }] }),
        );
    let api = TornApi::with_transport(transport.clone(), "key", BASE);

    let report = assemble_war_report_at(&api, 9999).await.expect("no failure");

    assert!(report.is_none());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn rewards_are_split_across_pools() {
    let api = TornApi::with_transport(fixture(json!(2000), true), "key", BASE);
    let settings = RewardSettings {
        api_key: "key".to_string(),
        attack_rewards: 1000.0,
        assist_rewards: 300.0,
        med_out_rewards: 200.0,
        revive_rewards: 100.0,
        payout_type: PayoutType::PerAttack,
        ignore_chain_bonus: false,
        min_med_outs: 0.0,
    };

    let summary = calculate_war_rewards(&api, &settings)
        .await
        .expect("calculation should succeed")
        .expect("war data should be present");

    let stats = &summary.war_stats;
    assert_eq!(stats.reward_per_attack, Some(10.0));
    assert_eq!(stats.reward_per_respect, None);
    assert_eq!(stats.reward_per_assist, 100.0);
    assert_eq!(stats.reward_per_med_out, 100.0);
    assert_eq!(stats.reward_per_revive, 100.0);

    let totals: Vec<(u64, f64)> = summary
        .user_stats
        .iter()
        .map(|user| (user.id, user.total_rewards))
        .collect();
    assert_eq!(totals, vec![(12, 300.0), (13, 250.0), (11, 200.0)]);

    let alpha = &summary.user_stats[2];
    assert_eq!(alpha.reward_attack_respect, 100.0);
    assert_eq!(alpha.reward_assists, 100.0);
    assert_eq!(alpha.bonus_respect, 5.0);
}

#[tokio::test]
async fn remote_errors_propagate() {
    let transport = FixtureTransport::new().with_response(
        "faction/basic",
        json!({ "error": { "code": 2, "error": "Incorrect key" } }),
    );
    let api = TornApi::with_transport(transport, "bad", BASE);

    let result = assemble_war_report_at(&api, 0).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn missing_faction_identity_has_no_report() {
    let transport = FixtureTransport::new().with_response("faction/basic", json!({}));
    let api = TornApi::with_transport(transport.clone(), "key", BASE);

    let report = assemble_war_report_at(&api, 9999).await.expect("no failure");

    assert!(report.is_none());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn missing_war_report_stops_before_aggregation() {
    let transport = FixtureTransport::new()
        .with_response("faction/basic", json!({ "basic": { "id": 1, "name": "Home" } }))
        .with_response(
            "faction/1/rankedwars",
            json!({ "rankedwars": [{ "id": 55, "start": 1000, "end": 2000 }] }),
        )
        .with_response("faction/55/rankedwarreport", json!({}));
    let api = TornApi::with_transport(transport.clone(), "key", BASE);

    let report = assemble_war_report_at(&api, 9999).await.expect("no failure");

    assert!(report.is_none());
    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(!requests.iter().any(|url| url.contains("chain")
        || url.contains("attacksfull")
        || url.contains("revivesFull")));
}

#[tokio::test]
async fn null_faction_totals_are_blanked() {
    let mut report = war_report(json!(2000), true);
    report["rankedwarreport"]["factions"][0]["attacks"] = Value::Null;
    report["rankedwarreport"]["factions"][0]["score"] = Value::Null;
    let transport = fixture(json!(2000), true).with_response("faction/55/rankedwarreport", report);
    let api = TornApi::with_transport(transport, "key", BASE);

    let assembled = assemble_war_report_at(&api, 9999)
        .await
        .expect("null totals should still decode")
        .expect("war data should be present");

    assert_eq!(assembled.total_attacks, 0);
    assert_eq!(assembled.total_respect, 0.0);
    assert_eq!(assembled.members.len(), 4);
}

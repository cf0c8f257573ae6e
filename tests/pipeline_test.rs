use std::io::Write;

use tempfile::Builder;

use meal_rebalancer_rs::catalog::load_catalog;
use meal_rebalancer_rs::models::{MacroRatio, MealSlot, Targets};
use meal_rebalancer_rs::planner::{DropReason, RebalanceStatus, match_suggestions};
use meal_rebalancer_rs::session::{PlanSession, PlanStatus};
use meal_rebalancer_rs::suggestion::{StaticSource, parse_meal_items};

const FOOD_DB: &str = "\
식품명,에너지(kcal),탄수화물(g),단백질(g),지방(g),당류(g),나트륨(mg)
잡곡밥,320,68,7,1.5,0,5
된장찌개,150,9,10,7,2,1200
된장국,60,5,4,2,1,800
제육볶음,420,15,28,27,8,900
고등어구이,300,0,30,20,0,400
닭볶음탕,450,20,40,22,6,1100
새우튀김,350,25,15,20,1,500
땅콩조림,250,15,10,17,12,300
시금치나물,40,4,2,2,1,300
배추김치,20,3,1,0.5,2,600
계란말이,130,2,10,9,-,250
";

const SUGGESTION: &str = "\
아침: 잡곡밥, 된장국, 계란말이, 배추김치
• (약 560 kcal / 탄수화물 약 80g, 단백질 약 25g, 지방 약 14g)
점심: 잡곡밥, 된장찌개, 제육볶음, 시금치나물, 땅콩조림
• (약 1,000 kcal / 탄수화물 약 110g, 단백질 약 55g, 지방 약 35g)
저녁: 잡곡밥, 새우튀김, 고등어구이, 배추김치
• (약 900 kcal / 탄수화물 약 100g, 단백질 약 50g, 지방 약 30g)
";

fn write_db() -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(FOOD_DB.as_bytes()).unwrap();
    file
}

fn korean_targets() -> Targets {
    Targets::new(
        2500.0,
        MacroRatio::new(50.0, 30.0, 20.0),
        vec!["우유".to_string(), "땅콩".to_string(), "새우".to_string()],
    )
}

#[test]
fn test_session_from_csv_catalog() {
    let db = write_db();
    let catalog = load_catalog(db.path()).unwrap();
    assert_eq!(catalog.len(), 11);

    let mut session = PlanSession::new(korean_targets());
    let report = session
        .run(&catalog, &StaticSource(SUGGESTION.to_string()))
        .unwrap();

    assert!(report.is_planned());
    assert_eq!(report.annotations.len(), 4);
    assert_eq!(report.annotations[3].kcal, 2460.0);

    // 땅콩조림 and 새우튀김 are excluded by name.
    assert_eq!(report.dropped.len(), 2);
    assert!(
        report
            .dropped
            .iter()
            .all(|d| matches!(d.reason, DropReason::Excluded { .. }))
    );
    assert_eq!(report.matched.len(), 11);
    for row in &report.selection {
        for banned in ["우유", "땅콩", "새우"] {
            assert!(!row.catalog_name.contains(banned));
        }
    }
    // 2060.5 kcal matched; one 438 kcal stew closes the gap.
    assert_eq!(report.status, PlanStatus::Planned(RebalanceStatus::Converged));
    assert_eq!(report.selection.len(), 12);
    assert_eq!(report.selection[11].catalog_name, "닭볶음탕");
    assert!(report.selection[11].slot.is_none());
}

#[test]
fn test_matching_is_first_substring_hit() {
    let db = write_db();
    let catalog = load_catalog(db.path()).unwrap();
    let meals = parse_meal_items("점심: 된장, 된장국, 제육볶음밥, 불고기");
    let outcome = match_suggestions(&meals, &catalog, &[]);

    let names: Vec<&str> = outcome
        .selection
        .records()
        .map(|r| r.name.as_str())
        .collect();
    // The two-character key "된장" hits 된장찌개 first.
    assert_eq!(names, vec!["된장찌개", "된장국", "제육볶음"]);
    assert_eq!(outcome.dropped.len(), 1);
    assert_eq!(outcome.dropped[0].slot, MealSlot::Lunch);
    assert_eq!(
        outcome.dropped[0].reason,
        DropReason::NoCatalogMatch {
            key: "불고기".to_string()
        }
    );
}

#[test]
fn test_unusable_suggestions_are_statuses_not_errors() {
    let db = write_db();
    let catalog = load_catalog(db.path()).unwrap();
    let mut session = PlanSession::new(korean_targets());

    let status = session.run_text(&catalog, "죄송합니다. 도와드릴 수 없습니다.").unwrap().status;
    assert_eq!(status, PlanStatus::NoItemsParsed);

    let status = session.run_text(&catalog, "저녁: 피자, 파스타").unwrap().status;
    assert_eq!(status, PlanStatus::NoMatches);
    assert!(session.last_report().unwrap().selection.is_empty());
}

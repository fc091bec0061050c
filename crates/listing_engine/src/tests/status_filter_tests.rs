use super::*;

#[derive(Debug, PartialEq)]
struct Item {
    id: u32,
    status: Option<&'static str>,
}

fn items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            status: Some("ACTIVE"),
        },
        Item {
            id: 2,
            status: Some("DRAFT"),
        },
        Item {
            id: 3,
            status: Some("ACTIVE"),
        },
    ]
}

fn ids(items: &[&Item]) -> Vec<u32> {
    items.iter().map(|item| item.id).collect()
}

#[test]
fn status_tab_keeps_matching_items_in_order() {
    let items = items();
    let active = filter_by_tab(&items, &StatusTab::status("ACTIVE"), |item| item.status);
    assert_eq!(ids(&active), vec![1, 3]);
}

#[test]
fn all_tab_returns_everything() {
    let items = items();
    let all = filter_by_tab(&items, &StatusTab::All, |item| item.status);
    assert_eq!(ids(&all), vec![1, 2, 3]);
}

#[test]
fn match_is_case_sensitive_and_exact() {
    let items = items();
    assert!(filter_by_tab(&items, &StatusTab::status("active"), |item| item.status).is_empty());
    assert!(filter_by_tab(&items, &StatusTab::status("ACTIVE "), |item| item.status).is_empty());
}

#[test]
fn items_without_status_only_show_under_all() {
    let items = vec![Item { id: 9, status: None }];
    assert!(filter_by_tab(&items, &StatusTab::status("SOLD"), |item| item.status).is_empty());
    assert_eq!(filter_by_tab(&items, &StatusTab::All, |item| item.status).len(), 1);
}

#[test]
fn filter_selection_switches_view() {
    let items = items();
    let mut filter = StatusFilter::default();
    assert_eq!(filter.tabs().len(), 4);
    assert_eq!(filter.selected(), &StatusTab::All);

    assert!(filter.select("DRAFT"));
    assert_eq!(ids(&filter.apply(&items, |item| item.status)), vec![2]);

    assert!(!filter.select("ARCHIVED"));
    assert_eq!(filter.selected(), &StatusTab::status("DRAFT"));

    assert!(filter.select("all"));
    assert_eq!(filter.apply(&items, |item| item.status).len(), 3);
}

#[test]
fn badge_reads_live_for_active() {
    assert_eq!(badge_label(Some("ACTIVE")), "Live");
    assert_eq!(badge_label(Some("SOLD")), "SOLD");
    assert_eq!(badge_label(Some("  ")), "Info");
    assert_eq!(badge_label(None), "Info");
}

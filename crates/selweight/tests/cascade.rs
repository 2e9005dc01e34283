//! Integration tests for declaration precedence.

use selweight::{
    DeclarationCandidate, Origin, Specificity, Winner, compare_declarations, parse_selector_list,
    select_winner, sort_by_precedence,
};

fn from_selector(text: &str, source_order: usize) -> DeclarationCandidate {
    let weight = parse_selector_list(text, None).unwrap().max_specificity();
    DeclarationCandidate::new(weight, source_order)
}

// ============================================================================
// STEP BY STEP
// ============================================================================

#[test]
fn test_important_beats_specificity() {
    let id = from_selector("#a", 0);
    let class = from_selector(".b", 1).important();
    assert_eq!(compare_declarations(&id, &class), Winner::Second);
    assert_eq!(compare_declarations(&class, &id), Winner::First);
}

#[test]
fn test_inline_beats_any_selector() {
    let heavy = from_selector("#a #b #c .d .e", 5);
    let inline = DeclarationCandidate::new(Specificity::ZERO, 0).inline();
    assert_eq!(compare_declarations(&heavy, &inline), Winner::Second);
}

#[test]
fn test_important_selector_beats_inline() {
    let important = from_selector("p", 0).important();
    let inline = DeclarationCandidate::new(Specificity::ZERO, 1).inline();
    assert_eq!(compare_declarations(&important, &inline), Winner::First);

    let both = DeclarationCandidate::new(Specificity::ZERO, 0).inline().important();
    assert_eq!(compare_declarations(&important, &both), Winner::Second);
}

#[test]
fn test_specificity_compares_tiers_in_order() {
    let one_id = from_selector("#a", 0);
    let many_classes = from_selector(".a.b.c.d.e.f.g.h.i.j.k", 1);
    assert_eq!(compare_declarations(&one_id, &many_classes), Winner::First);

    let one_class = from_selector(".a", 0);
    let many_types = from_selector("a b c d e f g h i j k", 1);
    assert_eq!(compare_declarations(&one_class, &many_types), Winner::First);
}

#[test]
fn test_source_order_breaks_ties() {
    let first = from_selector(".a", 0);
    let second = from_selector(".b", 1);
    assert_eq!(compare_declarations(&first, &second), Winner::Second);
    assert_eq!(compare_declarations(&second, &first), Winner::First);
}

#[test]
fn test_where_loses_to_type_selector() {
    let zeroed = from_selector(":where(#hero)", 1);
    let plain = from_selector("div", 0);
    assert_eq!(compare_declarations(&zeroed, &plain), Winner::Second);
}

// ============================================================================
// ORIGINS
// ============================================================================

#[test]
fn test_author_beats_user_agent_for_normal_declarations() {
    let ua = from_selector("#a", 1).with_origin(Origin::UserAgent);
    let author = from_selector("p", 0);
    assert_eq!(compare_declarations(&ua, &author), Winner::Second);
}

#[test]
fn test_user_agent_beats_author_when_both_important() {
    let ua = from_selector("p", 0).with_origin(Origin::UserAgent).important();
    let user = from_selector("p", 1).with_origin(Origin::User).important();
    let author = from_selector("#a", 2).important();
    assert_eq!(select_winner([&author, &user, &ua]), Some(&ua));
}

// ============================================================================
// SETS
// ============================================================================

#[test]
fn test_winner_of_a_set() {
    let candidates = vec![
        from_selector("div", 0),
        from_selector("#main", 1),
        from_selector(".x.y", 2),
        from_selector("#main", 3),
    ];
    let winner = select_winner(&candidates).unwrap();
    assert_eq!(winner.source_order, 3);
}

#[test]
fn test_sorting_agrees_with_pairwise_comparison() {
    let mut candidates = vec![
        from_selector("#a", 0),
        from_selector("p", 1).important(),
        DeclarationCandidate::new(Specificity::ZERO, 2).inline(),
        from_selector(".b", 3),
        from_selector(".c", 4).with_origin(Origin::User),
    ];
    sort_by_precedence(&mut candidates);

    let orders: Vec<usize> = candidates.iter().map(|c| c.source_order).collect();
    assert_eq!(orders, vec![4, 3, 0, 2, 1]);

    for pair in candidates.windows(2) {
        assert_eq!(compare_declarations(&pair[0], &pair[1]), Winner::Second);
    }
}

use super::*;

struct Probe {
    kind: &'static str,
    name: Option<&'static str>,
    classes: &'static [&'static str],
}

impl Matchable for Probe {
    fn kind(&self) -> &str {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }
}

const PLAYER: Probe = Probe { kind: "player", name: Some("hero"), classes: &["solid"] };
const WALL: Probe = Probe { kind: "wall", name: None, classes: &["solid", "static"] };
const COIN: Probe = Probe { kind: "coin", name: None, classes: &[] };

fn sel(raw: &str) -> Selector {
    Selector::parse(raw).expect("selector")
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_trims_and_keeps_source() {
    assert_eq!(sel("  wall.solid ").as_str(), "wall.solid");
    assert_eq!(sel("*").to_string(), "*");
}

#[test]
fn empty_selector_is_rejected() {
    assert!(matches!(Selector::parse("   "), Err(SelectorError::Empty(_))));
    assert!(matches!(Selector::parse("wall,"), Err(SelectorError::Empty(_))));
}

#[test]
fn combinators_are_rejected() {
    let err = Selector::parse("wall coin").expect_err("descendant");
    assert!(matches!(err, SelectorError::Unexpected { found: ' ', .. }));
    assert!(Selector::parse("wall > coin").is_err());
}

#[test]
fn bare_markers_are_rejected() {
    assert!(matches!(
        Selector::parse("wall."),
        Err(SelectorError::MissingIdentifier { marker: '.', .. })
    ));
    assert!(Selector::parse("#").is_err());
}

#[test]
fn everything_equals_parsed_star() {
    assert_eq!(Selector::everything(), sel("*"));
}

// =============================================================
// Matching
// =============================================================

#[test]
fn star_matches_everything() {
    let s = Selector::everything();
    assert!(s.matches(&PLAYER));
    assert!(s.matches(&WALL));
    assert!(s.matches(&COIN));
}

#[test]
fn kind_selector_matches_kind() {
    assert!(sel("wall").matches(&WALL));
    assert!(!sel("wall").matches(&PLAYER));
}

#[test]
fn class_selector_matches_class() {
    let s = sel(".solid");
    assert!(s.matches(&PLAYER));
    assert!(s.matches(&WALL));
    assert!(!s.matches(&COIN));
}

#[test]
fn compound_requires_every_part() {
    assert!(sel("wall.solid.static").matches(&WALL));
    assert!(!sel("player.static").matches(&PLAYER));
}

#[test]
fn name_selector_matches_name() {
    assert!(sel("#hero").matches(&PLAYER));
    assert!(sel("player#hero").matches(&PLAYER));
    assert!(!sel("#hero").matches(&WALL));
}

#[test]
fn list_matches_any_alternative() {
    let s = sel("coin, wall");
    assert!(s.matches(&COIN));
    assert!(s.matches(&WALL));
    assert!(!s.matches(&PLAYER));
}

#[test]
fn star_with_class_narrows() {
    assert!(sel("*.static").matches(&WALL));
    assert!(!sel("*.static").matches(&PLAYER));
}

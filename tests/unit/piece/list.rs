use std::sync::Arc;

use serde_json::{Value, json};

use super::*;
use crate::foundation::core::Gauge;
use crate::model::design::SpecSource;
use crate::piece::Attr;

struct MockPiece {
    id: u64,
    rows: u32,
    width: f64,
    callable_width: bool,
    sibling: Option<PieceRef>,
}

impl MockPiece {
    fn new(id: u64, rows: u32) -> Self {
        Self {
            id,
            rows,
            width: 20.0,
            callable_width: false,
            sibling: None,
        }
    }
}

impl Piece for MockPiece {
    fn id(&self) -> PieceId {
        PieceId(self.id)
    }

    fn kind(&self) -> &str {
        "MockPiece"
    }

    fn gauge(&self) -> Gauge {
        Gauge::new(5.0, 7.0).unwrap()
    }

    fn spec_source(&self) -> Arc<SpecSource> {
        Arc::new(SpecSource::default())
    }

    fn final_row(&self) -> Row {
        self.rows
    }

    fn fields(&self) -> Context {
        let mut c = Context::new();
        c.insert("width".to_string(), json!(self.width));
        c.insert("rows".to_string(), json!(self.rows));
        c
    }

    fn attr(&self, name: &str) -> Option<Attr> {
        match name {
            "width" if self.callable_width => {
                let w = self.width;
                Some(Attr::Method(Arc::new(move |_| Ok(json!(w)))))
            }
            "sibling" => self.sibling.clone().map(Attr::Piece),
            "final_row" => {
                let r = self.rows;
                Some(Attr::Method(Arc::new(move |_| Ok(json!(r)))))
            }
            "id" => Some(Attr::Value(json!(self.id))),
            _ => self.fields().remove(name).map(Attr::Value),
        }
    }
}

fn list(pieces: Vec<MockPiece>) -> PieceList {
    PieceList::new(pieces.into_iter().map(|p| Arc::new(p) as PieceRef).collect()).unwrap()
}

#[test]
fn empty_list_is_a_construction_error() {
    assert!(matches!(
        PieceList::new(vec![]),
        Err(PatternError::Construction(_))
    ));
}

#[test]
fn attribute_access_broadcasts_to_graded_values() {
    let l = list(vec![MockPiece::new(1, 40), MockPiece::new(2, 44)]);
    let rows = l.attr("rows").unwrap().into_values().unwrap();
    assert_eq!(rows.values(), &[json!(40), json!(44)]);
    assert_eq!(l.rows("rows").unwrap().values(), &[40, 44]);
    assert_eq!(l.ids(), vec![PieceId(1), PieceId(2)]);
    assert!(l.is_graded());
}

#[test]
fn callables_broadcast_to_a_callable() {
    let l = list(vec![MockPiece::new(1, 40), MockPiece::new(2, 44)]);
    let Broadcast::Callable(m) = l.attr("final_row").unwrap() else {
        panic!("expected callable");
    };
    assert_eq!(m.len(), 2);
    assert_eq!(m.call(&[]).unwrap().values(), &[json!(40), json!(44)]);
    assert_eq!(l.final_rows().unwrap().values(), &[40, 44]);
}

#[test]
fn mixed_callable_results_fail_loudly() {
    let mut odd = MockPiece::new(2, 44);
    odd.callable_width = true;
    let l = list(vec![MockPiece::new(1, 40), odd]);
    let err = l.attr("width").unwrap_err();
    assert!(matches!(err, PatternError::Broadcast(_)));
    assert!(err.to_string().contains("some but not all"));
}

#[test]
fn piece_valued_attributes_broadcast_to_piece_lists() {
    let mut a = MockPiece::new(1, 40);
    a.sibling = Some(Arc::new(MockPiece::new(10, 12)));
    let mut b = MockPiece::new(2, 44);
    b.sibling = Some(Arc::new(MockPiece::new(20, 14)));
    let siblings = list(vec![a, b]).attr("sibling").unwrap().into_pieces().unwrap();
    assert_eq!(siblings.ids(), vec![PieceId(10), PieceId(20)]);
}

#[test]
fn missing_attribute_is_reported_with_piece_id() {
    let l = list(vec![MockPiece::new(7, 40)]);
    let err = l.attr("sibling").unwrap_err();
    assert!(err.to_string().contains("piece 7"));
}

#[test]
fn item_access_broadcasts() {
    let l = list(vec![MockPiece::new(1, 40), MockPiece::new(2, 40)]);
    let w = l.item("width").unwrap();
    assert!(w.all_equal());
    assert!(l.item("nope").is_err());
}

#[test]
fn context_value_collapses_agreeing_sizes() {
    let l = list(vec![MockPiece::new(1, 40), MockPiece::new(2, 44)]);
    let ctx = l.to_context_value().unwrap();
    assert_eq!(ctx["width"], json!(20.0));
    assert_eq!(ctx["rows"], json!([40, 44]));
    assert_eq!(ctx["final_row"], json!([40, 44]));
    assert_eq!(ctx["is_graded"], Value::Bool(true));
    assert_eq!(ctx["kind"], json!("MockPiece"));
}

#![forbid(unsafe_code)]

//! JSON encoding of table cells: strings, integers and floats map to JSON
//! scalars, and an empty cell is the empty string (never `null`).

use sb_core::Cell;
use serde_json::Value;

pub(super) fn cell_to_json(cell: &Cell) -> Value {
    match cell.normalized() {
        Cell::Empty => Value::String(String::new()),
        Cell::Text(v) => Value::String(v),
        Cell::Int(v) => Value::from(v),
        Cell::Float(v) => serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
    }
}

pub(super) fn cell_from_json(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::String(v) => Cell::text(v.as_str()),
        Value::Number(n) => match n.as_i64() {
            Some(v) => Cell::Int(v),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Empty),
        },
        Value::Bool(true) => Cell::text("TRUE"),
        Value::Bool(false) => Cell::text("FALSE"),
        other => Cell::text(other.to_string()),
    }
}

pub(super) fn encode_row(cells: &[Cell]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&cells.iter().map(cell_to_json).collect::<Vec<_>>())
}

pub(super) fn decode_row(raw: &str) -> Result<Vec<Cell>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(raw)?;
    Ok(values.iter().map(cell_from_json).collect())
}

pub(super) fn encode_header(header: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(header)
}

pub(super) fn decode_header(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}

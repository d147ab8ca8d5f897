//! Value graph types
//!
//! Values form a tagged union of scalars and two composite shapes:
//! - `List`: ordered sequence of values
//! - `Map`: insertion-ordered string-keyed mapping
//!
//! Composites are shared nodes. Cloning a `Value` clones the handle, so two
//! handles to the same node observe each other's writes and compare equal by
//! identity. Every node carries two one-way flags:
//! - sealed: keys can no longer be added or removed
//! - frozen: nothing can change (implies sealed)

use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::{ValueError, ValueResult};

/// Backing node shared by every handle to one composite.
struct Node<T> {
    sealed: AtomicBool,
    frozen: AtomicBool,
    items: RwLock<T>,
}

impl<T> Node<T> {
    fn new(items: T) -> Arc<Self> {
        Arc::new(Self {
            sealed: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
            items: RwLock::new(items),
        })
    }

    fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Flags are flipped under the write lock so that a concurrent writer
    /// either completes before the freeze or observes it.
    fn mark_frozen(&self) {
        let _items = self.items.write();
        self.sealed.store(true, Ordering::Release);
        self.frozen.store(true, Ordering::Release);
    }

    fn mark_sealed(&self) {
        let _items = self.items.write();
        self.sealed.store(true, Ordering::Release);
    }
}

/// A dynamically typed value.
///
/// `Null` doubles as the "absent" marker: an override holding `Null` means
/// "keep the default".
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(List),
    Map(Map),
}

impl Value {
    /// Returns the runtime type name used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Identity of the composite node, `None` for scalars.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::List(list) => Some(list.id()),
            Value::Map(map) => Some(map.id()),
            _ => None,
        }
    }

    /// Reference equality for composites, value equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (a, b) if !a.is_composite() && !b.is_composite() => a == b,
            _ => false,
        }
    }

    /// Copies the whole graph into fresh, unsealed, unfrozen nodes.
    ///
    /// Shared and cyclic structure is reproduced in the copy.
    pub fn deep_copy(&self) -> Value {
        self.copy_with(&mut HashMap::new())
    }

    fn copy_with(&self, memo: &mut HashMap<usize, Value>) -> Value {
        match self {
            Value::List(list) => {
                if let Some(copy) = memo.get(&list.id()) {
                    return copy.clone();
                }
                let fresh = List::new();
                memo.insert(list.id(), Value::List(fresh.clone()));
                let items: Vec<Value> = list.to_vec().iter().map(|v| v.copy_with(memo)).collect();
                *fresh.0.items.write() = items;
                Value::List(fresh)
            }
            Value::Map(map) => {
                if let Some(copy) = memo.get(&map.id()) {
                    return copy.clone();
                }
                let fresh = Map::new();
                memo.insert(map.id(), Value::Map(fresh.clone()));
                let entries: Vec<(String, Value)> = map
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (k, v.copy_with(memo)))
                    .collect();
                *fresh.0.items.write() = entries;
                Value::Map(fresh)
            }
            scalar => scalar.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        eq_with(self, other, &mut HashSet::new())
    }
}

/// Structural equality. `active` holds the composite pairs currently being
/// compared; a pair met again on the same descent counts as equal, so
/// cyclic graphs terminate.
fn eq_with(a: &Value, b: &Value, active: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => int_eq_float(*a, *b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::List(a), Value::List(b)) => list_eq(a, b, active),
        (Value::Map(a), Value::Map(b)) => map_eq(a, b, active),
        _ => false,
    }
}

/// Exact comparison: the float must be integral and in `i64` range.
fn int_eq_float(int: i64, float: f64) -> bool {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    float.fract() == 0.0 && (-LIMIT..LIMIT).contains(&float) && float as i64 == int
}

fn list_eq(a: &List, b: &List, active: &mut HashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let key = (a.id(), b.id());
    if !active.insert(key) {
        return true;
    }
    let ours = a.to_vec();
    let theirs = b.to_vec();
    let equal = ours.len() == theirs.len()
        && ours
            .iter()
            .zip(theirs.iter())
            .all(|(x, y)| eq_with(x, y, active));
    active.remove(&key);
    equal
}

fn map_eq(a: &Map, b: &Map, active: &mut HashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let key = (a.id(), b.id());
    if !active.insert(key) {
        return true;
    }
    let ours = a.entries();
    let theirs = b.entries();
    let equal = ours.len() == theirs.len()
        && ours.iter().all(|(k, v)| {
            theirs
                .iter()
                .find(|(tk, _)| tk == k)
                .is_some_and(|(_, tv)| eq_with(v, tv, active))
        });
    active.remove(&key);
    equal
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::from(items))
    }
}

/// Shared, ordered sequence of values.
#[derive(Clone)]
pub struct List(Arc<Node<Vec<Value>>>);

impl List {
    pub fn new() -> Self {
        List(Node::new(Vec::new()))
    }

    /// Stable identity of the underlying node.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.read().get(index).cloned()
    }

    /// Shallow copy of the current elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.read().clone()
    }

    pub fn push(&self, value: Value) -> ValueResult<()> {
        let mut items = self.0.items.write();
        if self.0.is_frozen() {
            return Err(ValueError::frozen("list"));
        }
        items.push(value);
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&self, index: usize, value: Value) -> ValueResult<Value> {
        let mut items = self.0.items.write();
        if self.0.is_frozen() {
            return Err(ValueError::frozen("list"));
        }
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(ValueError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn remove(&self, index: usize) -> ValueResult<Value> {
        let mut items = self.0.items.write();
        if self.0.is_frozen() {
            return Err(ValueError::frozen("list"));
        }
        if index >= items.len() {
            return Err(ValueError::IndexOutOfBounds {
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    pub fn is_frozen(&self) -> bool {
        self.0.is_frozen()
    }

    pub(crate) fn mark_frozen(&self) {
        self.0.mark_frozen();
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List(Node::new(items))
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        list_eq(self, other, &mut HashSet::new())
    }
}

/// Shared, insertion-ordered mapping from field name to value.
#[derive(Clone)]
pub struct Map(Arc<Node<Vec<(String, Value)>>>);

impl Map {
    pub fn new() -> Self {
        Map(Node::new(Vec::new()))
    }

    /// Stable identity of the underlying node.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.read().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .items
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.items.read().iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.items.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.items.read().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Shallow copy of the current entries, in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.items.read().clone()
    }

    /// Replaces an existing entry or appends a new one.
    ///
    /// Replacing requires the map to be unfrozen; appending additionally
    /// requires it to be unsealed.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> ValueResult<Option<Value>> {
        let key = key.into();
        let mut items = self.0.items.write();
        if self.0.is_frozen() {
            return Err(ValueError::frozen("map"));
        }
        if let Some((_, slot)) = items.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        if self.0.is_sealed() {
            return Err(ValueError::sealed("add", key));
        }
        items.push((key, value));
        Ok(None)
    }

    pub fn remove(&self, key: &str) -> ValueResult<Option<Value>> {
        let mut items = self.0.items.write();
        if self.0.is_frozen() {
            return Err(ValueError::frozen("map"));
        }
        let Some(pos) = items.iter().position(|(k, _)| k == key) else {
            return Ok(None);
        };
        if self.0.is_sealed() {
            return Err(ValueError::sealed("remove", key));
        }
        Ok(Some(items.remove(pos).1))
    }

    /// Fixes the key set. Values may still be replaced until frozen.
    pub fn seal(&self) {
        self.0.mark_sealed();
    }

    pub fn is_sealed(&self) -> bool {
        self.0.is_sealed()
    }

    pub fn is_frozen(&self) -> bool {
        self.0.is_frozen()
    }

    pub(crate) fn mark_frozen(&self) {
        self.0.mark_frozen();
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut entries: Vec<(String, Value)> = Vec::new();
        for (key, value) in iter {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
        Map(Node::new(entries))
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        map_eq(self, other, &mut HashSet::new())
    }
}

thread_local! {
    /// Composites currently being formatted on this thread.
    static FORMATTING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

fn fmt_guarded(
    id: usize,
    f: &mut fmt::Formatter<'_>,
    body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    let entered = FORMATTING.with(|active| active.borrow_mut().insert(id));
    if !entered {
        return f.write_str("[Circular]");
    }
    let result = body(f);
    FORMATTING.with(|active| active.borrow_mut().remove(&id));
    result
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_guarded(self.id(), f, |f| f.debug_list().entries(self.to_vec().iter()).finish())
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_guarded(self.id(), f, |f| {
            let entries = self.entries();
            f.debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish()
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => fmt::Debug::fmt(b, f),
            Value::Int(n) => fmt::Debug::fmt(n, f),
            Value::Float(n) => fmt::Debug::fmt(n, f),
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::List(list) => fmt::Debug::fmt(list, f),
            Value::Map(map) => fmt::Debug::fmt(map, f),
        }
    }
}

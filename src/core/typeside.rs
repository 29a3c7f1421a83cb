// =============================================================================
// TYPESIDE — Les valeurs portées par les instances
// =============================================================================
//
// Le moteur ne type pas les données au niveau du schéma : une valeur
// appartient à l'objet qui la contient, rien de plus. Mais pour vivre dans
// des ENSEMBLES (BTreeSet), une valeur doit être totalement ordonnée, y
// compris les flottants. On utilise `f64::total_cmp` pour cela.
//
// Les valeurs numériques (Integer, Float) sont les seules prises en compte
// par l'agrégation pondérée de Σ.
//
// =============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Le type de base d'une valeur (sert aux diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Integer,
    Float,
    Boolean,
    Record,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::String => write!(f, "String"),
            BaseType::Integer => write!(f, "Int"),
            BaseType::Float => write!(f, "Float"),
            BaseType::Boolean => write!(f, "Bool"),
            BaseType::Record => write!(f, "Record"),
        }
    }
}

/// Une valeur opaque dans une instance.
///
/// L'égalité et l'ordre sont structurels. `Integer(1)` et `Float(1.0)` sont
/// deux valeurs distinctes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Enregistrement nommé (champ → valeur)
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Retourne le BaseType correspondant à cette valeur
    pub fn get_type(&self) -> BaseType {
        match self {
            Value::String(_) => BaseType::String,
            Value::Integer(_) => BaseType::Integer,
            Value::Float(_) => BaseType::Float,
            Value::Boolean(_) => BaseType::Boolean,
            Value::Record(_) => BaseType::Record,
        }
    }

    /// Lecture numérique : `Some` pour Integer et Float uniquement.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Construit un enregistrement à partir de paires (champ, valeur).
    pub fn record<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Integer(_) => 1,
            Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Record(_) => 4,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Record(a), Value::Record(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            // total_cmp distingue les motifs binaires : to_bits est cohérent avec Eq
            Value::Float(x) => x.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Record(fields) => fields.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

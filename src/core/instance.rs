// =============================================================================
// INSTANCE — Un foncteur Catégorie → Set (les données concrètes)
// =============================================================================
//
// Une INSTANCE I d'une catégorie K est un FONCTEUR :
//   I : K → Set
//
// Concrètement :
//   - Pour chaque OBJET, I assigne un ENSEMBLE fini de valeurs
//   - Pour chaque MORPHISME f : a → b, I assigne une FONCTION TOTALE
//     I(f) : I(a) → I(b)
//
// ANALOGIE : si la catégorie est le "moule", l'instance est le "contenu".
//
// EXEMPLE :
//   Catégorie : Employee --works_in--> Department
//
//   Instance :
//     Employee   = { "alice", "bob" }
//     Department = { "eng" }
//     works_in("alice") = "eng", works_in("bob") = "eng"
//
// DEUX CHOIX DE COMPORTEMENT :
//   - un objet sans données renvoie l'ensemble VIDE (pas une erreur :
//     "rien de chargé pour l'instant")
//   - un morphisme sans table renvoie l'IDENTITÉ. Une instance partielle
//     reste ainsi utilisable.
//
// Une instance est immuable : les migrations en produisent une nouvelle.
//
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use super::category::{Category, Morphism, Object};
use super::error::{Error, Result};
use super::typeside::Value;

static EMPTY: BTreeSet<Value> = BTreeSet::new();

/// La fonction I(f) d'un morphisme.
#[derive(Debug, Clone, Copy)]
pub enum ValueFn<'a> {
    /// Aucune table déclarée : v ↦ v
    Identity,
    /// Table explicite
    Table(&'a BTreeMap<Value, Value>),
}

impl ValueFn<'_> {
    /// Applique la fonction. `None` seulement pour une valeur hors du
    /// domaine d'une table explicite.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            ValueFn::Identity => Some(value.clone()),
            ValueFn::Table(table) => table.get(value).cloned(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, ValueFn::Identity)
    }
}

/// Instance complète : un foncteur K → Set.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    name: String,
    schema: Arc<Category>,
    /// objet → ensemble de valeurs
    sets: BTreeMap<Object, BTreeSet<Value>>,
    /// nom de morphisme → table (jamais pour une identité)
    functions: BTreeMap<String, BTreeMap<Value, Value>>,
}

impl Instance {
    /// Commence le remplissage d'une instance sur `schema`.
    pub fn builder(name: &str, schema: Arc<Category>) -> InstanceBuilder {
        InstanceBuilder {
            name: name.to_string(),
            schema,
            sets: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Assemble une instance sans validation. Réservé aux opérateurs de
    /// migration, qui garantissent eux-mêmes la totalité des tables.
    pub(crate) fn from_parts(
        name: String,
        schema: Arc<Category>,
        sets: BTreeMap<Object, BTreeSet<Value>>,
        functions: BTreeMap<String, BTreeMap<Value, Value>>,
    ) -> Self {
        Instance {
            name,
            schema,
            sets,
            functions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Arc<Category> {
        &self.schema
    }

    /// I(obj). Un objet inconnu ou vide donne l'ensemble vide.
    pub fn on_objects(&self, obj: &Object) -> &BTreeSet<Value> {
        self.sets.get(obj).unwrap_or(&EMPTY)
    }

    /// I(mor). Sans table déclarée, c'est l'identité.
    pub fn on_morphisms(&self, mor: &Morphism) -> ValueFn<'_> {
        if mor.is_identity() {
            return ValueFn::Identity;
        }
        match self.functions.get(&mor.name) {
            Some(table) => ValueFn::Table(table),
            None => ValueFn::Identity,
        }
    }

    /// Nombre total de valeurs, tous objets confondus.
    pub fn total_values(&self) -> usize {
        self.sets.values().map(BTreeSet::len).sum()
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "instance {} : {} = {{", self.name, self.schema.name())?;

        for (obj, values) in &self.sets {
            if values.is_empty() {
                continue;
            }
            let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
            writeln!(f, "  {} ({} valeurs) = {{{}}}", obj, values.len(), rendered.join(", "))?;
        }

        for (mor, table) in &self.functions {
            let rendered: Vec<String> = table
                .iter()
                .map(|(v, image)| format!("{} -> {}", v, image))
                .collect();
            writeln!(f, "  {} : {}", mor, rendered.join(", "))?;
        }

        write!(f, "}}")
    }
}

/// Remplissage en cours d'une instance. Tout est vérifié dans `build()`.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    name: String,
    schema: Arc<Category>,
    sets: Vec<(Object, Vec<Value>)>,
    functions: Vec<(String, Vec<(Value, Value)>)>,
}

impl InstanceBuilder {
    /// Ajoute des valeurs à l'ensemble de `obj`.
    pub fn insert<I, V>(&mut self, obj: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.sets
            .push((Object::new(obj), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Déclare la table de `morphism` : paires (valeur, image).
    pub fn map<I, A, B>(&mut self, morphism: &str, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Value>,
        B: Into<Value>,
    {
        self.functions.push((
            morphism.to_string(),
            pairs.into_iter().map(|(a, b)| (a.into(), b.into())).collect(),
        ));
        self
    }

    /// Construit l'instance. Chaque table doit être totale sur l'ensemble
    /// source et rester dans l'ensemble cible. Les entrées hors du domaine
    /// sont écartées.
    pub fn build(&self) -> Result<Instance> {
        let mut sets: BTreeMap<Object, BTreeSet<Value>> = BTreeMap::new();
        for (obj, values) in &self.sets {
            if !self.schema.contains_object(obj) {
                return Err(Error::UnknownObject {
                    object: obj.clone(),
                    category: self.schema.name().to_string(),
                });
            }
            sets.entry(obj.clone()).or_default().extend(values.iter().cloned());
        }

        let mut functions = BTreeMap::new();
        for (name, pairs) in &self.functions {
            let morphism = self.schema.morphism(name).ok_or_else(|| Error::UnknownMorphism {
                morphism: name.clone(),
                category: self.schema.name().to_string(),
            })?;
            if morphism.is_identity() {
                return Err(Error::IdentityFunction { morphism: name.clone() });
            }

            let mut declared: BTreeMap<&Value, &Value> = BTreeMap::new();
            for (a, b) in pairs {
                if let Some(first) = declared.insert(a, b).filter(|first| *first != b) {
                    return Err(Error::ConflictingImages {
                        morphism: name.clone(),
                        value: a.clone(),
                        first: first.clone(),
                        second: b.clone(),
                    });
                }
            }
            let domain = sets.get(&morphism.source).unwrap_or(&EMPTY);
            let codomain = sets.get(&morphism.target).unwrap_or(&EMPTY);

            let mut table = BTreeMap::new();
            for value in domain {
                let image = declared.get(value).ok_or_else(|| Error::NonTotalFunction {
                    morphism: name.clone(),
                    value: value.clone(),
                })?;
                if !codomain.contains(*image) {
                    return Err(Error::ImageOutsideTarget {
                        morphism: name.clone(),
                        value: value.clone(),
                        image: (*image).clone(),
                    });
                }
                table.insert(value.clone(), (*image).clone());
            }
            functions.insert(name.clone(), table);
        }

        Ok(Instance {
            name: self.name.clone(),
            schema: Arc::clone(&self.schema),
            sets,
            functions,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn company_schema() -> Arc<Category> {
        let mut b = Category::builder("Company");
        b.object("Employee")
            .object("Department")
            .morphism("works_in", "Employee", "Department");
        Arc::new(b.build().unwrap())
    }

    fn company_instance() -> Instance {
        let mut b = Instance::builder("CompanyData", company_schema());
        b.insert("Employee", ["alice", "bob", "charlie"])
            .insert("Department", ["eng", "mkt"])
            .map(
                "works_in",
                [("alice", "eng"), ("bob", "eng"), ("charlie", "mkt")],
            );
        b.build().unwrap()
    }

    #[test]
    fn test_create_instance() {
        let inst = company_instance();
        assert_eq!(inst.total_values(), 5);
        assert_eq!(inst.on_objects(&Object::new("Employee")).len(), 3);
        assert_eq!(inst.on_objects(&Object::new("Department")).len(), 2);
    }

    #[test]
    fn test_unknown_object_is_empty() {
        let inst = company_instance();
        assert!(inst.on_objects(&Object::new("Ghost")).is_empty());
    }

    #[test]
    fn test_apply_function() {
        let inst = company_instance();
        let works_in = inst.schema().morphism("works_in").unwrap().clone();
        let f = inst.on_morphisms(&works_in);
        assert!(!f.is_identity());
        assert_eq!(f.apply(&Value::from("charlie")), Some(Value::from("mkt")));
        assert_eq!(f.apply(&Value::from("nobody")), None);
    }

    #[test]
    fn test_missing_table_falls_back_to_identity() {
        let mut b = Category::builder("Loop");
        b.object("A").morphism("next", "A", "A");
        let schema = Arc::new(b.build().unwrap());

        let mut ib = Instance::builder("Partial", Arc::clone(&schema));
        ib.insert("A", [1, 2]);
        let inst = ib.build().unwrap();

        let next = schema.morphism("next").unwrap();
        let f = inst.on_morphisms(next);
        assert!(f.is_identity());
        assert_eq!(f.apply(&Value::from(2)), Some(Value::from(2)));
    }

    #[test]
    fn test_non_total_function_rejected() {
        let mut b = Instance::builder("Broken", company_schema());
        b.insert("Employee", ["alice", "bob"])
            .insert("Department", ["eng"])
            .map("works_in", [("alice", "eng")]);
        assert!(matches!(b.build(), Err(Error::NonTotalFunction { .. })));
    }

    #[test]
    fn test_image_outside_target_rejected() {
        let mut b = Instance::builder("Broken", company_schema());
        b.insert("Employee", ["alice"])
            .insert("Department", ["eng"])
            .map("works_in", [("alice", "hr")]);
        assert!(matches!(b.build(), Err(Error::ImageOutsideTarget { .. })));
    }

    #[test]
    fn test_conflicting_pairs_rejected() {
        let mut b = Instance::builder("Broken", company_schema());
        b.insert("Employee", ["alice"])
            .insert("Department", ["eng", "mkt"])
            .map("works_in", [("alice", "eng"), ("alice", "mkt")]);
        assert!(matches!(
            b.build(),
            Err(Error::ConflictingImages { ref value, .. }) if *value == Value::from("alice")
        ));

        // une paire répétée à l'identique reste une fonction
        let mut b = Instance::builder("Repeated", company_schema());
        b.insert("Employee", ["alice"])
            .insert("Department", ["eng"])
            .map("works_in", [("alice", "eng"), ("alice", "eng")]);
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_unknown_references_rejected() {
        let mut b = Instance::builder("Broken", company_schema());
        b.insert("Ghost", [1]);
        assert!(matches!(b.build(), Err(Error::UnknownObject { .. })));

        let mut b = Instance::builder("Broken", company_schema());
        b.map("manages", [(1, 2)]);
        assert!(matches!(b.build(), Err(Error::UnknownMorphism { .. })));

        let mut b = Instance::builder("Broken", company_schema());
        b.map("id_Employee", [(1, 1)]);
        assert!(matches!(b.build(), Err(Error::IdentityFunction { .. })));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", company_instance());
        assert!(display.contains("instance CompanyData : Company"));
        assert!(display.contains("Employee (3 valeurs)"));
        assert!(display.contains("\"alice\" -> \"eng\""));
    }
}

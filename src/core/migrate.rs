// =============================================================================
// MIGRATE — Les trois opérations fondamentales de migration : Δ, Σ, Π
// =============================================================================
//
// Étant donné un foncteur F : C → D, on peut migrer les données dans TROIS
// directions :
//
// ┌─────────────────────────────────────────────────────────────────────┐
// │                                                                     │
// │  Δ_F (Delta / Pullback)     — "Réindexer selon la source"           │
// │  Prend une instance de D, produit une instance de C                 │
// │  Δ_F(I)(c) = I(F(c)) : aucune perte, aucune agrégation              │
// │                                                                     │
// │  Σ_F (Sigma / Colimite)     — "Pousser vers la cible, en OU"        │
// │  Prend une instance de C, produit une instance de D                 │
// │  Σ_F(I)(d) = union des I(c) de la fibre de d                        │
// │              (ou moyenne pondérée des valeurs numériques)           │
// │                                                                     │
// │  Π_F (Pi / Limite)          — "Pousser vers la cible, en ET"        │
// │  Prend une instance de C, produit une instance de D                 │
// │  Π_F(I)(d) = intersection des I(c) de la fibre de d                 │
// │              (puis filtrage optionnel par un prédicat)              │
// │                                                                     │
// └─────────────────────────────────────────────────────────────────────┘
//
// LA FIBRE de d, c'est l'ensemble des objets c de C tels que F(c) = d.
// Fibre vide → ensemble vide (pas une erreur).
//
// Les fonctions des morphismes de D sont TRANSPORTÉES par Σ (union) et Π
// quand c'est possible sans ambiguïté : sinon le morphisme garde la
// fonction identité par défaut.
//
// Chaque opérateur rend une NOUVELLE instance ; l'entrée n'est jamais
// modifiée.
//
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::category::{Category, Object};
use super::error::{Error, Result};
use super::functor::Functor;
use super::instance::{Instance, ValueFn};
use super::typeside::Value;

type Sets = BTreeMap<Object, BTreeSet<Value>>;
type Functions = BTreeMap<String, BTreeMap<Value, Value>>;

/// Mode d'agrégation de Σ.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Aggregation {
    /// Union ensembliste (la colimite)
    #[default]
    Union,
    /// Moyenne pondérée des valeurs numériques ; poids 1 par défaut
    WeightedAverage { weights: BTreeMap<Object, f64> },
}

/// Que faire d'une valeur non numérique en moyenne pondérée.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonNumeric {
    /// L'ignorer (et le journaliser)
    #[default]
    Skip,
    /// Échouer avec `Error::NonNumericValue`
    Reject,
}

/// Options de Σ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SigmaOptions {
    pub aggregation: Aggregation,
    pub on_non_numeric: NonNumeric,
}

impl SigmaOptions {
    pub fn union() -> Self {
        SigmaOptions::default()
    }

    /// Moyenne pondérée, avec les poids donnés par objet de C.
    pub fn weighted<'a, I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        SigmaOptions {
            aggregation: Aggregation::WeightedAverage {
                weights: weights.into_iter().map(|(o, w)| (Object::new(o), w)).collect(),
            },
            on_non_numeric: NonNumeric::Skip,
        }
    }

    pub fn reject_non_numeric(mut self) -> Self {
        self.on_non_numeric = NonNumeric::Reject;
        self
    }
}

/// Prédicat de filtrage de Π.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Options de Π.
#[derive(Clone, Default)]
pub struct PiOptions {
    pub predicate: Option<Predicate>,
}

impl PiOptions {
    pub fn with_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for PiOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiOptions")
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Effectue la migration Delta : Δ_F(I sur D) → instance sur C
///
/// ALGORITHME :
/// Pour chaque objet c de C : Δ(c) = I(F(c))
/// Pour chaque morphisme f de C : Δ(f) = I(F(f)), restreint à I(F(c))
///
/// Si F n'est pas injectif, plusieurs c partagent les mêmes données :
/// c'est le cas normal d'un pullback.
pub fn delta(functor: &Functor, instance: &Instance) -> Result<Instance> {
    ensure_schema(functor.target(), instance)?;
    let source = functor.source();

    let mut sets = Sets::new();
    for c in source.objects() {
        let d = functor.on_objects(c)?;
        sets.insert(c.clone(), instance.on_objects(d).clone());
    }

    let mut functions = Functions::new();
    for f in source.generators() {
        let image = functor.on_morphisms(f)?;
        let pulled = instance.on_morphisms(&image);
        if pulled.is_identity() {
            continue;
        }
        match total_table(&sets, &f.source, &f.target, |v| pulled.apply(v)) {
            Some(table) => {
                functions.insert(f.name.clone(), table);
            }
            None => debug!(
                morphism = %f.name,
                image = %image.name,
                "delta : fonction non totale après réindexation, identité conservée"
            ),
        }
    }

    debug!(functor = %functor.name(), objects = sets.len(), "delta");
    Ok(Instance::from_parts(
        format!("delta_{}({})", functor.name(), instance.name()),
        Arc::clone(source),
        sets,
        functions,
    ))
}

/// Effectue la migration Sigma : Σ_F(I sur C) → instance sur D
///
/// ALGORITHME :
/// Pour chaque objet d de D :
///   1. Collecter la fibre de d
///   2. Union : réunir les ensembles de la fibre
///      Moyenne pondérée : Σ(v × w(c)) / Σ w(c) sur toutes les valeurs
///      numériques, résultat singleton
///   3. Transporter les fonctions (mode union uniquement)
pub fn sigma(functor: &Functor, instance: &Instance, options: &SigmaOptions) -> Result<Instance> {
    ensure_schema(functor.source(), instance)?;
    ensure_mapped(functor)?;
    if let Aggregation::WeightedAverage { weights } = &options.aggregation {
        check_weights(weights)?;
    }

    let mut sets = Sets::new();
    for d in functor.target().objects() {
        let fiber = functor.fiber(d);
        let set: BTreeSet<Value> = match &options.aggregation {
            Aggregation::Union => fiber
                .iter()
                .flat_map(|c| instance.on_objects(c).iter().cloned())
                .collect(),
            Aggregation::WeightedAverage { weights } => {
                weighted_average(&fiber, instance, weights, options.on_non_numeric)?
            }
        };
        debug!(object = %d, fiber = fiber.len(), values = set.len(), "sigma");
        sets.insert(d.clone(), set);
    }

    let functions = match options.aggregation {
        Aggregation::Union => transport(functor, instance, &sets)?,
        Aggregation::WeightedAverage { .. } => Functions::new(),
    };

    Ok(Instance::from_parts(
        format!("sigma_{}({})", functor.name(), instance.name()),
        Arc::clone(functor.target()),
        sets,
        functions,
    ))
}

/// Effectue la migration Pi : Π_F(I sur C) → instance sur D
///
/// ALGORITHME :
/// Pour chaque objet d de D de fibre {c_1, ..., c_n} :
///   Π(d) = I(c_1) ∩ ... ∩ I(c_n), puis filtré par le prédicat s'il existe
///
/// Fibre vide → vide ; fibre singleton → I(c) inchangé.
pub fn pi(functor: &Functor, instance: &Instance, options: &PiOptions) -> Result<Instance> {
    ensure_schema(functor.source(), instance)?;
    ensure_mapped(functor)?;

    let mut sets = Sets::new();
    for d in functor.target().objects() {
        let fiber = functor.fiber(d);
        let mut set = match fiber.split_first() {
            None => BTreeSet::new(),
            Some((first, rest)) => {
                let mut acc = instance.on_objects(first).clone();
                for c in rest {
                    let other = instance.on_objects(c);
                    acc.retain(|v| other.contains(v));
                }
                acc
            }
        };
        if let Some(predicate) = &options.predicate {
            set.retain(|v| predicate(v));
        }
        debug!(object = %d, fiber = fiber.len(), values = set.len(), "pi");
        sets.insert(d.clone(), set);
    }

    let functions = transport(functor, instance, &sets)?;

    Ok(Instance::from_parts(
        format!("pi_{}({})", functor.name(), instance.name()),
        Arc::clone(functor.target()),
        sets,
        functions,
    ))
}

fn ensure_schema(expected: &Arc<Category>, instance: &Instance) -> Result<()> {
    if **expected != **instance.schema() {
        return Err(Error::CategoryMismatch {
            expected: expected.name().to_string(),
            found: instance.schema().name().to_string(),
        });
    }
    Ok(())
}

/// Un objet sans image verrait ses données disparaître sans bruit.
/// Σ et Π exigent un foncteur complet, quel que soit le mode : chaque
/// objet et chaque morphisme non identité de C doit avoir une image.
fn ensure_mapped(functor: &Functor) -> Result<()> {
    for c in functor.source().objects() {
        functor.on_objects(c)?;
    }
    for f in functor.source().generators() {
        functor.on_morphisms(f)?;
    }
    Ok(())
}

fn check_weights(weights: &BTreeMap<Object, f64>) -> Result<()> {
    for (object, &weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight {
                object: object.clone(),
                weight,
            });
        }
    }
    Ok(())
}

fn weighted_average(
    fiber: &[&Object],
    instance: &Instance,
    weights: &BTreeMap<Object, f64>,
    policy: NonNumeric,
) -> Result<BTreeSet<Value>> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for &c in fiber {
        let weight = weights.get(c).copied().unwrap_or(1.0);
        for value in instance.on_objects(c) {
            match (value.as_f64(), policy) {
                (Some(x), _) => {
                    weighted_sum += x * weight;
                    total_weight += weight;
                }
                (None, NonNumeric::Skip) => warn!(
                    object = %c,
                    %value,
                    kind = %value.get_type(),
                    "moyenne pondérée : valeur non numérique ignorée"
                ),
                (None, NonNumeric::Reject) => {
                    return Err(Error::NonNumericValue {
                        object: c.clone(),
                        value: value.clone(),
                    })
                }
            }
        }
    }

    if total_weight <= 0.0 {
        return Ok(BTreeSet::new());
    }
    Ok(BTreeSet::from([Value::Float(weighted_sum / total_weight)]))
}

/// Table totale de `sets[source]` vers `sets[target]`, ou `None` si une
/// valeur n'a pas d'image ou si une image sort de la cible.
fn total_table<F>(sets: &Sets, source: &Object, target: &Object, image: F) -> Option<BTreeMap<Value, Value>>
where
    F: Fn(&Value) -> Option<Value>,
{
    let empty = BTreeSet::new();
    let domain = sets.get(source).unwrap_or(&empty);
    let codomain = sets.get(target).unwrap_or(&empty);
    domain
        .iter()
        .map(|v| {
            let w = image(v)?;
            codomain.contains(&w).then(|| (v.clone(), w))
        })
        .collect()
}

/// Transporte les fonctions de C vers les morphismes de D.
///
/// Pour g dans D, on réunit les paires v ↦ I(f)(v) de tous les f avec
/// F(f) = g. La table n'est gardée que si elle est cohérente, totale sur
/// le nouvel ensemble source et à valeurs dans le nouvel ensemble cible.
fn transport(functor: &Functor, instance: &Instance, sets: &Sets) -> Result<Functions> {
    let mut functions = Functions::new();

    for g in functor.target().generators() {
        let mut pairs: BTreeMap<Value, Value> = BTreeMap::new();
        let mut consistent = true;

        for f in functor.source().generators() {
            if functor.on_morphisms(f)? != *g {
                continue;
            }
            let i_f: ValueFn<'_> = instance.on_morphisms(f);
            for v in instance.on_objects(&f.source) {
                match i_f.apply(v) {
                    Some(w) if pairs.get(v).is_some_and(|previous| *previous != w) => {
                        consistent = false;
                    }
                    Some(w) => {
                        pairs.insert(v.clone(), w);
                    }
                    None => consistent = false,
                }
            }
        }

        if pairs.is_empty() {
            continue;
        }
        if !consistent {
            debug!(morphism = %g.name, "transport ambigu, identité conservée");
            continue;
        }
        match total_table(sets, &g.source, &g.target, |v| pairs.get(v).cloned()) {
            Some(table) => {
                functions.insert(g.name.clone(), table);
            }
            None => debug!(morphism = %g.name, "transport partiel, identité conservée"),
        }
    }

    Ok(functions)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const EQUAL_WEIGHTS: [(&str, f64); 0] = [];

    fn obj(name: &str) -> Object {
        Object::new(name)
    }

    fn values<I, V>(items: I) -> BTreeSet<Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        items.into_iter().map(Into::into).collect()
    }

    /// C = {A, B} discrète, D = {X}, F(A) = F(B) = X
    fn collapse() -> Functor {
        let c = Arc::new(Category::discrete("C", ["A", "B"]));
        let d = Arc::new(Category::discrete("D", ["X"]));
        let mut b = Functor::builder("Collapse", c, d);
        b.map_object("A", "X").map_object("B", "X");
        b.build().unwrap()
    }

    fn collapse_instance<A, B, V>(a: A, b: B) -> Instance
    where
        A: IntoIterator<Item = V>,
        B: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let f = collapse();
        let mut ib = Instance::builder("I", Arc::clone(f.source()));
        ib.insert("A", a).insert("B", b);
        ib.build().unwrap()
    }

    /// Ancien format : Person --works_in--> Dept
    fn old_schema() -> Arc<Category> {
        let mut b = Category::builder("Old");
        b.object("Person")
            .object("Dept")
            .morphism("works_in", "Person", "Dept");
        Arc::new(b.build().unwrap())
    }

    /// Nouveau format : Employee --department--> Department
    fn new_schema() -> Arc<Category> {
        let mut b = Category::builder("New");
        b.object("Employee")
            .object("Department")
            .morphism("department", "Employee", "Department");
        Arc::new(b.build().unwrap())
    }

    /// Renommage des objets et du morphisme
    fn rename_functor() -> Functor {
        let mut b = Functor::builder("Rename", old_schema(), new_schema());
        b.map_object("Person", "Employee")
            .map_object("Dept", "Department")
            .map_morphism("works_in", "department");
        b.build().unwrap()
    }

    /// A1 --f1--> B1 et A2 --f2--> B2, écrasés sur A --f--> B
    fn merge(f2_on_two: &str) -> (Functor, Instance) {
        let mut cb = Category::builder("Twin");
        cb.object("A1")
            .object("B1")
            .object("A2")
            .object("B2")
            .morphism("f1", "A1", "B1")
            .morphism("f2", "A2", "B2");
        let c = Arc::new(cb.build().unwrap());

        let mut db = Category::builder("Single");
        db.object("A").object("B").morphism("f", "A", "B");
        let d = Arc::new(db.build().unwrap());

        let mut fb = Functor::builder("Merge", Arc::clone(&c), d);
        fb.map_object("A1", "A")
            .map_object("A2", "A")
            .map_object("B1", "B")
            .map_object("B2", "B")
            .map_morphism("f1", "f")
            .map_morphism("f2", "f");

        let mut ib = Instance::builder("Twins", c);
        ib.insert("A1", [1, 2])
            .insert("A2", [2, 3])
            .insert("B1", ["x", "y"])
            .insert("B2", ["y", "z", "w"])
            .map("f1", [(1, "x"), (2, "y")])
            .map("f2", [(2, f2_on_two), (3, "z")]);

        (fb.build().unwrap(), ib.build().unwrap())
    }

    #[test]
    fn test_sigma_union_scenario() {
        let f = collapse();
        let inst = collapse_instance([1, 2, 3], [2, 3, 4]);
        let out = sigma(&f, &inst, &SigmaOptions::union()).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([1, 2, 3, 4]));
    }

    #[test]
    fn test_pi_intersection_scenario() {
        let f = collapse();
        let inst = collapse_instance([1, 2, 3], [2, 3, 4]);
        let out = pi(&f, &inst, &PiOptions::default()).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([2, 3]));
    }

    #[test]
    fn test_sigma_weighted_scenario() {
        let f = collapse();
        let inst = collapse_instance([10], [20]);
        let opts = SigmaOptions::weighted([("A", 1.0), ("B", 3.0)]);
        let out = sigma(&f, &inst, &opts).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([17.5]));
    }

    #[test]
    fn test_sigma_weighted_default_weights_is_mean() {
        let f = collapse();
        let inst = collapse_instance([1, 2], [6]);
        let out = sigma(&f, &inst, &SigmaOptions::weighted(EQUAL_WEIGHTS)).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([3.0]));
    }

    #[test]
    fn test_sigma_weighted_skips_non_numeric() {
        let f = collapse();
        let mut ib = Instance::builder("Mixed", Arc::clone(f.source()));
        ib.insert("A", [Value::from(4), Value::from("n/a")])
            .insert("B", [Value::from(8.0)]);
        let inst = ib.build().unwrap();

        let out = sigma(&f, &inst, &SigmaOptions::weighted(EQUAL_WEIGHTS)).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([6.0]));

        let strict = SigmaOptions::weighted(EQUAL_WEIGHTS).reject_non_numeric();
        assert!(matches!(
            sigma(&f, &inst, &strict),
            Err(Error::NonNumericValue { .. })
        ));
    }

    #[test]
    fn test_sigma_weighted_without_numbers_is_empty() {
        let f = collapse();
        let inst = collapse_instance(["a"], ["b"]);
        let out = sigma(&f, &inst, &SigmaOptions::weighted(EQUAL_WEIGHTS)).unwrap();
        assert!(out.on_objects(&obj("X")).is_empty());
    }

    #[test]
    fn test_sigma_invalid_weight() {
        let f = collapse();
        let inst = collapse_instance([1], [2]);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let opts = SigmaOptions::weighted([("A", bad)]);
            assert!(matches!(
                sigma(&f, &inst, &opts),
                Err(Error::InvalidWeight { .. })
            ));
        }
    }

    #[test]
    fn test_empty_fiber_gives_empty_set() {
        let c = Arc::new(Category::discrete("C", ["A"]));
        let d = Arc::new(Category::discrete("D", ["X", "Lonely"]));
        let mut fb = Functor::builder("Embed", Arc::clone(&c), d);
        fb.map_object("A", "X");
        let f = fb.build().unwrap();
        let mut ib = Instance::builder("I", c);
        ib.insert("A", [1]);
        let inst = ib.build().unwrap();

        let s = sigma(&f, &inst, &SigmaOptions::union()).unwrap();
        let p = pi(&f, &inst, &PiOptions::default()).unwrap();
        assert!(s.on_objects(&obj("Lonely")).is_empty());
        assert!(p.on_objects(&obj("Lonely")).is_empty());
        // fibre singleton : Π rend l'ensemble tel quel
        assert_eq!(p.on_objects(&obj("X")), &values([1]));
    }

    #[test]
    fn test_pi_predicate_filters_after_intersection() {
        let f = collapse();
        let inst = collapse_instance([1, 2, 3, 4], [2, 3, 4, 5]);
        let opts = PiOptions::default()
            .with_predicate(|v| v.as_f64().is_some_and(|x| x >= 3.0));
        let out = pi(&f, &inst, &opts).unwrap();
        assert_eq!(out.on_objects(&obj("X")), &values([3, 4]));
    }

    #[test]
    fn test_sigma_simple_rename() {
        let f = rename_functor();
        let mut ib = Instance::builder("OldData", old_schema());
        ib.insert("Person", ["alice", "bob"])
            .insert("Dept", ["eng", "mkt"])
            .map("works_in", [("alice", "eng"), ("bob", "mkt")]);
        let old = ib.build().unwrap();

        let new = sigma(&f, &old, &SigmaOptions::union()).unwrap();
        assert_eq!(new.on_objects(&obj("Employee")).len(), 2);
        assert_eq!(new.on_objects(&obj("Department")).len(), 2);

        let department = new.schema().morphism("department").unwrap().clone();
        let dep = new.on_morphisms(&department);
        assert!(!dep.is_identity());
        assert_eq!(dep.apply(&Value::from("bob")), Some(Value::from("mkt")));
    }

    #[test]
    fn test_delta_simple_rename() {
        let f = rename_functor();
        let mut ib = Instance::builder("NewData", new_schema());
        ib.insert("Employee", ["diana"])
            .insert("Department", ["rnd"])
            .map("department", [("diana", "rnd")]);
        let new = ib.build().unwrap();

        let old = delta(&f, &new).unwrap();
        assert_eq!(old.on_objects(&obj("Person")), &values(["diana"]));
        assert_eq!(old.on_objects(&obj("Dept")), &values(["rnd"]));

        let works_in = old.schema().morphism("works_in").unwrap().clone();
        assert_eq!(
            old.on_morphisms(&works_in).apply(&Value::from("diana")),
            Some(Value::from("rnd"))
        );
    }

    #[test]
    fn test_delta_non_injective_shares_data() {
        let f = collapse();
        let mut ib = Instance::builder("J", Arc::clone(f.target()));
        ib.insert("X", [7, 8]);
        let j = ib.build().unwrap();

        let pulled = delta(&f, &j).unwrap();
        assert_eq!(pulled.on_objects(&obj("A")), &values([7, 8]));
        assert_eq!(pulled.on_objects(&obj("B")), &values([7, 8]));
    }

    #[test]
    fn test_transport_merges_consistent_functions() {
        let (f, inst) = merge("y");
        let s = sigma(&f, &inst, &SigmaOptions::union()).unwrap();
        assert_eq!(s.on_objects(&obj("A")), &values([1, 2, 3]));
        let g = s.schema().morphism("f").unwrap().clone();
        assert_eq!(s.on_morphisms(&g).apply(&Value::from(3)), Some(Value::from("z")));

        let p = pi(&f, &inst, &PiOptions::default()).unwrap();
        assert_eq!(p.on_objects(&obj("A")), &values([2]));
        assert_eq!(p.on_objects(&obj("B")), &values(["y"]));
        assert_eq!(p.on_morphisms(&g).apply(&Value::from(2)), Some(Value::from("y")));
    }

    #[test]
    fn test_transport_conflict_keeps_identity() {
        let (f, inst) = merge("w");
        let s = sigma(&f, &inst, &SigmaOptions::union()).unwrap();
        let g = s.schema().morphism("f").unwrap().clone();
        assert!(s.on_morphisms(&g).is_identity());
    }

    #[test]
    fn test_schema_mismatch() {
        let f = rename_functor();
        let mut ib = Instance::builder("Wrong", old_schema());
        ib.insert("Person", ["x"]);
        let wrong = ib.build().unwrap();
        assert!(matches!(delta(&f, &wrong), Err(Error::CategoryMismatch { .. })));

        let mut ib = Instance::builder("Wrong", new_schema());
        ib.insert("Employee", ["x"]);
        let wrong = ib.build().unwrap();
        assert!(matches!(
            sigma(&f, &wrong, &SigmaOptions::union()),
            Err(Error::CategoryMismatch { .. })
        ));
        assert!(matches!(
            pi(&f, &wrong, &PiOptions::default()),
            Err(Error::CategoryMismatch { .. })
        ));
    }

    #[test]
    fn test_unmapped_object_is_fatal() {
        let c = Arc::new(Category::discrete("C", ["A", "B"]));
        let d = Arc::new(Category::discrete("D", ["X"]));
        let mut fb = Functor::builder("Half", Arc::clone(&c), Arc::clone(&d));
        fb.map_object("A", "X");
        let f = fb.build().unwrap();

        let inst = Instance::builder("I", c).build().unwrap();
        let j = Instance::builder("J", d).build().unwrap();
        assert!(matches!(delta(&f, &j), Err(Error::UnmappedObject { .. })));
        assert!(matches!(
            sigma(&f, &inst, &SigmaOptions::union()),
            Err(Error::UnmappedObject { .. })
        ));
        assert!(matches!(
            pi(&f, &inst, &PiOptions::default()),
            Err(Error::UnmappedObject { .. })
        ));
    }

    #[test]
    fn test_unmapped_morphism_is_fatal_in_every_mode() {
        // D discrète : rien à transporter, l'oubli doit quand même se voir
        let mut cb = Category::builder("C");
        cb.object("A").object("B").morphism("f", "A", "B");
        let c = Arc::new(cb.build().unwrap());
        let d = Arc::new(Category::discrete("D", ["X"]));
        let mut fb = Functor::builder("NoArrow", Arc::clone(&c), Arc::clone(&d));
        fb.map_object("A", "X").map_object("B", "X");
        let f = fb.build().unwrap();

        let mut ib = Instance::builder("I", c);
        ib.insert("A", [1]).insert("B", [1]);
        let inst = ib.build().unwrap();
        let j = Instance::builder("J", d).build().unwrap();

        for opts in [SigmaOptions::union(), SigmaOptions::weighted(EQUAL_WEIGHTS)] {
            assert!(matches!(
                sigma(&f, &inst, &opts),
                Err(Error::UnmappedMorphism { .. })
            ));
        }
        assert!(matches!(
            pi(&f, &inst, &PiOptions::default()),
            Err(Error::UnmappedMorphism { .. })
        ));
        assert!(matches!(delta(&f, &j), Err(Error::UnmappedMorphism { .. })));
    }

    #[test]
    fn test_input_is_untouched() {
        let f = collapse();
        let inst = collapse_instance([1], [2]);
        let before = inst.clone();
        let _ = sigma(&f, &inst, &SigmaOptions::union()).unwrap();
        let _ = pi(&f, &inst, &PiOptions::default()).unwrap();
        assert_eq!(inst, before);
    }
}

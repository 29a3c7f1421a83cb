// =============================================================================
// ADJUNCTION — Vérification concrète de Σ ⊣ Δ ⊣ Π
// =============================================================================
//
// Une adjonction Σ_F ⊣ Δ_F, c'est une bijection naturelle :
//
//   Hom(Σ_F(I), J)  ≅  Hom(I, Δ_F(J))
//
// où Hom(X, Y) est l'ensemble des TRANSFORMATIONS NATURELLES X ⇒ Y entre
// deux instances : une fonction α_k : X(k) → Y(k) par objet, telle que
// pour chaque morphisme f : a → b :
//
//   Y(f) ∘ α_a = α_b ∘ X(f)
//
// On ne prouve rien en général : on ÉNUMÈRE les deux ensembles pour des
// instances concrètes et petites, puis on vérifie que la transposition
//
//   α ↦ α♭     avec   α♭_c(v) = α_F(c)(v)      (précomposition par l'inclusion I(c) ⊆ Σ(I)(F(c)))
//
// est une bijection. Même chose pour Δ_F ⊣ Π_F, avec l'inclusion
// Π(I)(F(c)) ⊆ I(c).
//
// ATTENTION : notre Σ est une UNION ensembliste. Quand deux objets d'une
// même fibre partagent des valeurs, l'union n'est pas un coproduit et la
// bijection casse : la vérification répond alors `false`, honnêtement.
//
// L'énumération est exponentielle : elle est bornée par une limite sur le
// nombre de candidats.
//
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::category::Object;
use super::error::{Error, Result};
use super::functor::Functor;
use super::instance::Instance;
use super::migrate::{delta, pi, sigma, PiOptions, SigmaOptions};
use super::typeside::Value;

/// Limite par défaut du nombre de candidats énumérés.
pub const DEFAULT_HOM_LIMIT: u128 = 100_000;

/// Une transformation naturelle entre deux instances : une fonction par objet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transformation {
    components: BTreeMap<Object, BTreeMap<Value, Value>>,
}

impl Transformation {
    /// La composante α_obj, si l'objet a des données.
    pub fn component(&self, obj: &Object) -> Option<&BTreeMap<Value, Value>> {
        self.components.get(obj)
    }

    /// α_obj(value)
    pub fn apply(&self, obj: &Object, value: &Value) -> Option<&Value> {
        self.components.get(obj).and_then(|c| c.get(value))
    }
}

/// Résultat détaillé d'une vérification d'adjonction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjunctionReport {
    /// Taille du hom-set côté adjoint (Hom(Σ I, J) ou Hom(J, Π I))
    pub left: usize,
    /// Taille du hom-set côté Δ (Hom(I, Δ J) ou Hom(Δ J, I))
    pub right: usize,
    /// La transposition est-elle une bijection ?
    pub bijective: bool,
}

/// Énumère Hom(source, target) : toutes les transformations naturelles.
///
/// Échoue avec `HomSetTooLarge` si Π |target(k)|^|source(k)| dépasse `limit`.
pub fn homomorphisms(source: &Instance, target: &Instance, limit: u128) -> Result<Vec<Transformation>> {
    if **source.schema() != **target.schema() {
        return Err(Error::CategoryMismatch {
            expected: source.schema().name().to_string(),
            found: target.schema().name().to_string(),
        });
    }
    let schema = source.schema();

    let candidates = candidate_count(source, target);
    if candidates > limit {
        return Err(Error::HomSetTooLarge { candidates, limit });
    }
    // un objet peuplé sans cible : aucune fonction, donc aucun morphisme
    if candidates == 0 {
        trace!(source = %source.name(), target = %target.name(), "hom-set vide");
        return Ok(Vec::new());
    }

    let mut partial = vec![BTreeMap::new()];
    for obj in schema.objects() {
        let (dom, cod) = (source.on_objects(obj), target.on_objects(obj));
        let per_object = function_count(dom, cod);
        if per_object > limit {
            return Err(Error::HomSetTooLarge {
                candidates: per_object,
                limit,
            });
        }
        let functions = all_functions(dom, cod);
        let mut next = Vec::with_capacity(partial.len() * functions.len());
        for prefix in &partial {
            for function in &functions {
                let mut extended = prefix.clone();
                extended.insert(obj.clone(), function.clone());
                next.push(extended);
            }
        }
        partial = next;
    }

    let homs: Vec<Transformation> = partial
        .into_iter()
        .map(|components| Transformation { components })
        .filter(|alpha| is_natural(alpha, source, target))
        .collect();

    trace!(
        source = %source.name(),
        target = %target.name(),
        candidates,
        natural = homs.len(),
        "hom-set énuméré"
    );
    Ok(homs)
}

/// Vérifie Hom(Σ_F(I), J) ≅ Hom(I, Δ_F(J)), avec la limite par défaut.
pub fn verify_adjunction_sigma_delta(functor: &Functor, i: &Instance, j: &Instance) -> Result<bool> {
    Ok(sigma_delta_report(functor, i, j, DEFAULT_HOM_LIMIT)?.bijective)
}

/// Vérifie Hom(Δ_F(J), I) ≅ Hom(J, Π_F(I)), avec la limite par défaut.
pub fn verify_adjunction_delta_pi(functor: &Functor, j: &Instance, i: &Instance) -> Result<bool> {
    Ok(delta_pi_report(functor, j, i, DEFAULT_HOM_LIMIT)?.bijective)
}

/// Rapport détaillé pour Σ_F ⊣ Δ_F. `i` est sur la source de F, `j` sur la cible.
pub fn sigma_delta_report(
    functor: &Functor,
    i: &Instance,
    j: &Instance,
    limit: u128,
) -> Result<AdjunctionReport> {
    let sigma_i = sigma(functor, i, &SigmaOptions::union())?;
    let delta_j = delta(functor, j)?;

    let left = homomorphisms(&sigma_i, j, limit)?;
    let right = homomorphisms(i, &delta_j, limit)?;
    Ok(compare(functor, &left, &right, i))
}

/// Rapport détaillé pour Δ_F ⊣ Π_F. `j` est sur la cible de F, `i` sur la source.
pub fn delta_pi_report(
    functor: &Functor,
    j: &Instance,
    i: &Instance,
    limit: u128,
) -> Result<AdjunctionReport> {
    let pi_i = pi(functor, i, &PiOptions::default())?;
    let delta_j = delta(functor, j)?;

    let left = homomorphisms(j, &pi_i, limit)?;
    let right = homomorphisms(&delta_j, i, limit)?;
    Ok(compare(functor, &left, &right, &delta_j))
}

/// Transpose chaque α de `left` (sur D) en une transformation sur C dont
/// la composante en c est α_F(c) restreinte à `domain(c)`, puis compare
/// avec `right`.
fn compare(
    functor: &Functor,
    left: &[Transformation],
    right: &[Transformation],
    domain: &Instance,
) -> AdjunctionReport {
    let transposed: Option<BTreeSet<Transformation>> = left
        .iter()
        .map(|alpha| transpose(functor, alpha, domain))
        .collect();
    let expected: BTreeSet<&Transformation> = right.iter().collect();

    let bijective = match transposed {
        Some(images) => images.len() == left.len() && images.iter().eq(expected.iter().copied()),
        None => false,
    };

    AdjunctionReport {
        left: left.len(),
        right: right.len(),
        bijective,
    }
}

fn transpose(functor: &Functor, alpha: &Transformation, domain: &Instance) -> Option<Transformation> {
    let mut components = BTreeMap::new();
    for c in functor.source().objects() {
        let d = functor.on_objects(c).ok()?;
        let mut component = BTreeMap::new();
        for v in domain.on_objects(c) {
            component.insert(v.clone(), alpha.apply(d, v)?.clone());
        }
        components.insert(c.clone(), component);
    }
    Some(Transformation { components })
}

fn candidate_count(source: &Instance, target: &Instance) -> u128 {
    let mut total: u128 = 1;
    for obj in source.schema().objects() {
        total = total.saturating_mul(function_count(source.on_objects(obj), target.on_objects(obj)));
    }
    total
}

/// |codomain|^|domain|, saturé.
fn function_count(domain: &BTreeSet<Value>, codomain: &BTreeSet<Value>) -> u128 {
    let exp = u32::try_from(domain.len()).unwrap_or(u32::MAX);
    (codomain.len() as u128).checked_pow(exp).unwrap_or(u128::MAX)
}

/// Toutes les fonctions de `domain` vers `codomain`.
fn all_functions(domain: &BTreeSet<Value>, codomain: &BTreeSet<Value>) -> Vec<BTreeMap<Value, Value>> {
    let dom: Vec<&Value> = domain.iter().collect();
    let cod: Vec<&Value> = codomain.iter().collect();
    if dom.is_empty() {
        return vec![BTreeMap::new()];
    }
    if cod.is_empty() {
        return Vec::new();
    }

    // compteur en base |cod|, un chiffre par élément du domaine
    let mut digits = vec![0usize; dom.len()];
    let mut functions = Vec::new();
    loop {
        functions.push(
            dom.iter()
                .zip(&digits)
                .map(|(v, &i)| ((*v).clone(), cod[i].clone()))
                .collect(),
        );

        let mut pos = 0;
        loop {
            if pos == digits.len() {
                return functions;
            }
            digits[pos] += 1;
            if digits[pos] < cod.len() {
                break;
            }
            digits[pos] = 0;
            pos += 1;
        }
    }
}

/// target(f) ∘ α_a = α_b ∘ source(f) pour chaque morphisme f : a → b.
fn is_natural(alpha: &Transformation, source: &Instance, target: &Instance) -> bool {
    source.schema().generators().all(|f| {
        let s_f = source.on_morphisms(f);
        let t_f = target.on_morphisms(f);
        source.on_objects(&f.source).iter().all(|v| {
            let via_target = alpha.apply(&f.source, v).and_then(|w| t_f.apply(w));
            let via_source = s_f.apply(v).and_then(|w| alpha.apply(&f.target, &w).cloned());
            via_target.is_some() && via_target == via_source
        })
    })
}

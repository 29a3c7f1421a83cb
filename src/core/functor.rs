// =============================================================================
// FUNCTOR — Un foncteur entre deux catégories finies
// =============================================================================
//
// Un foncteur F : C → D assigne :
//   - à chaque OBJET de C, un OBJET de D
//   - à chaque MORPHISME f : a → b de C, un MORPHISME F(f) : F(a) → F(b) de D
//
// ET doit respecter deux lois :
//   F(id_a)        = id_F(a)                (identités)
//   F(compose(f,g)) = compose(F(f), F(g))   (composition)
//
// Les identités ne se déclarent jamais : leur image est dérivée.
//
// IMPORTANT : un foncteur incomplet se construit quand même. Les auteurs de
// schémas itèrent, et un mapping partiel est un état normal pendant ce
// travail. Les lois se vérifient À LA DEMANDE (`verify_laws`), et une
// violation est un DIAGNOSTIC, pas une erreur.
//
// EXEMPLE :
//   C : Person --friend_of--> Person
//   D : User   --buddy-->     User
//
//   F(Person) = User
//   F(friend_of) = buddy
//
// Les MIGRATIONS DE DONNÉES (Δ, Σ, Π) se font le long de ces foncteurs.
//
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::category::{Category, Morphism, Object};
use super::error::{Error, Result};

/// Une loi fonctorielle prise en défaut (diagnostic, jamais levé).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LawViolation {
    /// Objet de la source sans image
    UnmappedObject { object: Object },
    /// Morphisme de la source sans image
    UnmappedMorphism { morphism: String },
    /// F(f) ne va pas de F(a) vers F(b)
    Endpoints { morphism: String, image: String },
    /// F(id_a) différent de id_F(a)
    Identity { object: Object },
    /// F(compose(f,g)) différent de compose(F(f), F(g)), ou ce dernier n'existe pas
    Composition { left: String, right: String },
}

impl fmt::Display for LawViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LawViolation::UnmappedObject { object } => {
                write!(f, "objet '{}' sans image", object)
            }
            LawViolation::UnmappedMorphism { morphism } => {
                write!(f, "morphisme '{}' sans image", morphism)
            }
            LawViolation::Endpoints { morphism, image } => write!(
                f,
                "l'image '{}' de '{}' n'a pas les bonnes extrémités",
                image, morphism
            ),
            LawViolation::Identity { object } => {
                write!(f, "identité de '{}' non préservée", object)
            }
            LawViolation::Composition { left, right } => write!(
                f,
                "composition de '{}' puis '{}' non préservée",
                left, right
            ),
        }
    }
}

/// Un foncteur F : source → target.
#[derive(Debug, Clone)]
pub struct Functor {
    name: String,
    source: Arc<Category>,
    target: Arc<Category>,
    /// objet de C → objet de D
    object_map: BTreeMap<Object, Object>,
    /// nom de morphisme de C → nom de morphisme de D (identités de D permises)
    morphism_map: BTreeMap<String, String>,
}

impl Functor {
    /// Commence la description d'un foncteur.
    pub fn builder(name: &str, source: Arc<Category>, target: Arc<Category>) -> FunctorBuilder {
        FunctorBuilder {
            name: name.to_string(),
            source,
            target,
            objects: Vec::new(),
            morphisms: Vec::new(),
        }
    }

    /// Le foncteur identité d'une catégorie.
    pub fn identity(category: Arc<Category>) -> Self {
        let object_map = category.objects().map(|o| (o.clone(), o.clone())).collect();
        let morphism_map = category
            .generators()
            .map(|m| (m.name.clone(), m.name.clone()))
            .collect();
        Functor {
            name: format!("id_{}", category.name()),
            source: Arc::clone(&category),
            target: category,
            object_map,
            morphism_map,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Arc<Category> {
        &self.source
    }

    pub fn target(&self) -> &Arc<Category> {
        &self.target
    }

    /// F(obj).
    pub fn on_objects(&self, obj: &Object) -> Result<&Object> {
        self.object_map.get(obj).ok_or_else(|| Error::UnmappedObject {
            object: obj.clone(),
            functor: self.name.clone(),
        })
    }

    /// F(mor). Les identités sont dérivées : F(id_a) = id_F(a).
    pub fn on_morphisms(&self, mor: &Morphism) -> Result<Morphism> {
        if mor.is_identity() {
            let image = self.on_objects(&mor.source)?;
            return self.target.identity(image);
        }
        self.morphism_map
            .get(&mor.name)
            .and_then(|name| self.target.morphism(name))
            .cloned()
            .ok_or_else(|| Error::UnmappedMorphism {
                morphism: mor.name.clone(),
                functor: self.name.clone(),
            })
    }

    /// La fibre de `d` : tous les objets `c` de la source avec F(c) = d.
    pub fn fiber(&self, d: &Object) -> Vec<&Object> {
        self.object_map
            .iter()
            .filter(|(_, image)| *image == d)
            .map(|(c, _)| c)
            .collect()
    }

    /// Compose `self` puis `next` : le résultat est `next ∘ self`.
    ///
    /// Les éléments sans image de part ou d'autre restent sans image.
    pub fn then(&self, next: &Functor) -> Result<Functor> {
        if self.target != next.source {
            return Err(Error::CategoryMismatch {
                expected: next.source.name().to_string(),
                found: self.target.name().to_string(),
            });
        }

        let mut object_map = BTreeMap::new();
        for (c, d) in &self.object_map {
            if let Ok(e) = next.on_objects(d) {
                object_map.insert(c.clone(), e.clone());
            }
        }

        let mut morphism_map = BTreeMap::new();
        for (f, image) in &self.morphism_map {
            let Some(mid) = self.target.morphism(image) else {
                continue;
            };
            if let Ok(end) = next.on_morphisms(mid) {
                morphism_map.insert(f.clone(), end.name);
            }
        }

        Ok(Functor {
            name: format!("{};{}", self.name, next.name),
            source: Arc::clone(&self.source),
            target: Arc::clone(&next.target),
            object_map,
            morphism_map,
        })
    }

    /// Rapport complet des lois prises en défaut.
    pub fn law_violations(&self) -> Vec<LawViolation> {
        let mut violations = Vec::new();

        for obj in self.source.objects() {
            match self.on_objects(obj) {
                Err(_) => violations.push(LawViolation::UnmappedObject { object: obj.clone() }),
                Ok(image) => {
                    let preserved = self.source.identity(obj).and_then(|id| {
                        Ok(self.on_morphisms(&id)? == self.target.identity(image)?)
                    });
                    if !matches!(preserved, Ok(true)) {
                        violations.push(LawViolation::Identity { object: obj.clone() });
                    }
                }
            }
        }

        for f in self.source.generators() {
            let image = match self.on_morphisms(f) {
                Ok(image) => image,
                Err(_) => {
                    violations.push(LawViolation::UnmappedMorphism { morphism: f.name.clone() });
                    continue;
                }
            };
            let (Ok(a), Ok(b)) = (self.on_objects(&f.source), self.on_objects(&f.target)) else {
                continue;
            };
            if &image.source != a || &image.target != b {
                violations.push(LawViolation::Endpoints {
                    morphism: f.name.clone(),
                    image: image.name,
                });
            }
        }

        for (f, g) in self.source.composable_pairs() {
            let Ok(h) = self.source.compose(f, g) else {
                continue;
            };
            let (Ok(ff), Ok(fg), Ok(fh)) =
                (self.on_morphisms(f), self.on_morphisms(g), self.on_morphisms(&h))
            else {
                continue;
            };
            match self.target.compose(&ff, &fg) {
                Ok(composed) if composed == fh => {}
                _ => violations.push(LawViolation::Composition {
                    left: f.name.clone(),
                    right: g.name.clone(),
                }),
            }
        }

        violations
    }

    /// Vérifie les lois fonctorielles. Retourne `false` à la première
    /// violation, après l'avoir journalisée.
    pub fn verify_laws(&self) -> bool {
        match self.law_violations().first() {
            None => true,
            Some(violation) => {
                tracing::warn!(functor = %self.name, %violation, "loi fonctorielle violée");
                false
            }
        }
    }
}

impl fmt::Display for Functor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "functor {} : {} -> {} = {{",
            self.name,
            self.source.name(),
            self.target.name()
        )?;

        writeln!(f, "  objects")?;
        for (src, tgt) in &self.object_map {
            writeln!(f, "    {} -> {}", src, tgt)?;
        }

        if !self.morphism_map.is_empty() {
            writeln!(f, "  morphisms")?;
            for (src, tgt) in &self.morphism_map {
                writeln!(f, "    {} -> {}", src, tgt)?;
            }
        }

        write!(f, "}}")
    }
}

/// Description en cours d'un foncteur.
#[derive(Debug, Clone)]
pub struct FunctorBuilder {
    name: String,
    source: Arc<Category>,
    target: Arc<Category>,
    objects: Vec<(Object, Object)>,
    morphisms: Vec<(String, String)>,
}

impl FunctorBuilder {
    /// F(source) = target
    pub fn map_object(&mut self, source: &str, target: &str) -> &mut Self {
        self.objects.push((Object::new(source), Object::new(target)));
        self
    }

    /// F(source) = target. `target` peut être une identité de D
    /// (le morphisme est alors "écrasé").
    pub fn map_morphism(&mut self, source: &str, target: &str) -> &mut Self {
        self.morphisms.push((source.to_string(), target.to_string()));
        self
    }

    /// Vérifie que chaque nom existe du bon côté. Les lois ne sont PAS
    /// vérifiées ici.
    pub fn build(&self) -> Result<Functor> {
        let mut object_map = BTreeMap::new();
        for (c, d) in &self.objects {
            for (obj, cat) in [(c, &self.source), (d, &self.target)] {
                if !cat.contains_object(obj) {
                    return Err(Error::UnknownObject {
                        object: obj.clone(),
                        category: cat.name().to_string(),
                    });
                }
            }
            object_map.insert(c.clone(), d.clone());
        }

        let mut morphism_map = BTreeMap::new();
        for (f, g) in &self.morphisms {
            let mf = self.source.morphism(f).ok_or_else(|| Error::UnknownMorphism {
                morphism: f.clone(),
                category: self.source.name().to_string(),
            })?;
            if mf.is_identity() {
                return Err(Error::IdentityFunction { morphism: f.clone() });
            }
            if self.target.morphism(g).is_none() {
                return Err(Error::UnknownMorphism {
                    morphism: g.clone(),
                    category: self.target.name().to_string(),
                });
            }
            morphism_map.insert(f.clone(), g.clone());
        }

        Ok(Functor {
            name: self.name.clone(),
            source: Arc::clone(&self.source),
            target: Arc::clone(&self.target),
            object_map,
            morphism_map,
        })
    }
}

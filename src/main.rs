// =============================================================================
// CATMIG — Point d'entrée : démonstration des migrations fonctorielles
// =============================================================================
//
// Ce main.rs montre un exemple complet :
//   1. Définir deux schémas (deux sources qui fusionnent en une seule)
//   2. Créer le foncteur de fusion et vérifier ses lois
//   3. Migrer les données (Σ en union, Π en intersection, Δ en retour)
//   4. Agréger des scores de qualité par moyenne pondérée
//   5. Vérifier les lois sur un schéma avec composition
//   6. Vérifier concrètement l'adjonction Σ ⊣ Δ
//
// Journalisation : RUST_LOG=catmig=debug pour suivre chaque migration.
//
// =============================================================================

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use catmig::core::adjunction;
use catmig::core::category::{Category, Object};
use catmig::core::functor::Functor;
use catmig::core::instance::Instance;
use catmig::core::migrate::{self, PiOptions, SigmaOptions};
use catmig::core::typeside::Value;
use catmig::core::validate;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "catmig=info".into()))
        .with(fmt::layer())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // erreur structurelle : c'est le schéma qu'il faut corriger
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> catmig::Result<()> {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║      CATMIG — Migrations fonctorielles           ║");
    println!("║      Δ, Σ, Π sur des catégories finies           ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 1 : Les schémas (deux sources, une cible)
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 1 : Schémas source et cible ═══\n");

    let sources = Arc::new(Category::discrete("Sources", ["Crm", "Erp"]));
    let unified = Arc::new(Category::discrete("Unified", ["Customer"]));
    println!("{}\n", sources);
    println!("{}\n", unified);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 2 : Le foncteur de fusion
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 2 : Foncteur Sources → Unified ═══\n");

    let mut builder = Functor::builder("Merge", Arc::clone(&sources), Arc::clone(&unified));
    builder
        .map_object("Crm", "Customer")
        .map_object("Erp", "Customer");
    let merge = builder.build()?;
    println!("{}\n", merge);

    if merge.verify_laws() {
        println!("✓ Lois fonctorielles respectées\n");
    } else {
        println!("✗ Le foncteur viole ses lois\n");
    }

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 3 : Les données et leurs migrations
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 3 : Σ, Π et Δ ═══\n");

    let mut data = Instance::builder("Customers", Arc::clone(&sources));
    data.insert("Crm", [1, 2, 3]).insert("Erp", [2, 3, 4]);
    let customers = data.build()?;
    println!("{}\n", customers);

    let union = migrate::sigma(&merge, &customers, &SigmaOptions::union())?;
    println!("Σ (tous les clients connus) :\n{}\n", union);

    let common = migrate::pi(&merge, &customers, &PiOptions::default())?;
    println!("Π (clients présents partout) :\n{}\n", common);

    let even = PiOptions::default()
        .with_predicate(|v| matches!(v, Value::Integer(n) if n % 2 == 0));
    let common_even = migrate::pi(&merge, &customers, &even)?;
    println!("Π filtré (identifiants pairs) :\n{}\n", common_even);

    let back = migrate::delta(&merge, &union)?;
    println!("Δ (retour vers les sources) :\n{}\n", back);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 4 : Score de qualité pondéré
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 4 : Moyenne pondérée ═══\n");

    let mut scores = Instance::builder("Scores", Arc::clone(&sources));
    scores.insert("Crm", [10.0]).insert("Erp", [20.0]);
    let scores = scores.build()?;

    let weighted = SigmaOptions::weighted([("Crm", 1.0), ("Erp", 3.0)]);
    let quality = migrate::sigma(&merge, &scores, &weighted)?;
    println!("Score (Crm ×1, Erp ×3) :\n{}\n", quality);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 5 : Un schéma avec composition
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 5 : Composition et validation ═══\n");

    let mut company = Category::builder("Company");
    company
        .object("Employee")
        .object("Department")
        .object("Manager")
        .morphism("works_in", "Employee", "Department")
        .morphism("managed_by", "Department", "Manager")
        .morphism("boss", "Employee", "Manager")
        .composite("works_in", "managed_by", "boss");
    let company = Arc::new(company.build()?);
    println!("{}\n", company);

    let works_in = company.hom(&Object::new("Employee"), &Object::new("Department"));
    let managed_by = company.hom(&Object::new("Department"), &Object::new("Manager"));
    if let (Some(f), Some(g)) = (works_in.first(), managed_by.first()) {
        println!("works_in ; managed_by = {}\n", company.compose(f, g)?.name);
    }

    let mut staff = Instance::builder("Staff", Arc::clone(&company));
    staff
        .insert("Employee", ["alice", "bob"])
        .insert("Department", ["eng"])
        .insert("Manager", ["carol"])
        .map("works_in", [("alice", "eng"), ("bob", "eng")])
        .map("managed_by", [("eng", "carol")])
        .map("boss", [("alice", "carol"), ("bob", "carol")]);
    let staff = staff.build()?;

    match validate::validate_instance(&staff) {
        Ok(()) => println!("✓ Instance valide (fonctorialité respectée)\n"),
        Err(errors) => {
            for e in errors {
                println!("✗ {}", e);
            }
        }
    }

    let identity = Functor::identity(Arc::clone(&company));
    let same = migrate::delta(&identity, &staff)?;
    let unchanged = company
        .objects()
        .all(|o| same.on_objects(o) == staff.on_objects(o));
    println!("Δ_id(Staff) == Staff sur les ensembles : {}\n", unchanged);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 6 : Adjonction Σ ⊣ Δ
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 6 : Adjonction Σ ⊣ Δ ═══\n");

    let mut flags = Instance::builder("Flags", Arc::clone(&unified));
    flags.insert("Customer", [0, 1]);
    let flags = flags.build()?;

    let report = adjunction::sigma_delta_report(&merge, &customers, &flags, adjunction::DEFAULT_HOM_LIMIT)?;
    println!(
        "|Hom(Σ I, J)| = {}, |Hom(I, Δ J)| = {}, bijection : {}",
        report.left, report.right, report.bijective
    );
    println!("(les sources se recouvrent : l'union n'est pas un coproduit)\n");

    let mut disjoint = Instance::builder("Disjoint", Arc::clone(&sources));
    disjoint.insert("Crm", [1]).insert("Erp", [2]);
    let disjoint = disjoint.build()?;
    let holds = adjunction::verify_adjunction_sigma_delta(&merge, &disjoint, &flags)?;
    println!("Sources disjointes, bijection : {}\n", holds);

    println!("═══ Terminé ═══");
    Ok(())
}

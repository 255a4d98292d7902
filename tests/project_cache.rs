//! Directory cache behaviour: memoization, config sharing, concurrency.

mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{entry, Project};
use flagscope::config::EngineOptions;
use flagscope::project::{CompilationDatabase, CompilationIndex, ProjectIndexCache};
use flagscope::Resolver;

fn counting_cache(opens: Arc<AtomicUsize>) -> ProjectIndexCache {
    let options = EngineOptions::default();
    let file_name = options.database_file.clone();
    ProjectIndexCache::with_opener(
        options,
        Box::new(move |dir: &Path| {
            opens.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(CompilationDatabase::open(dir, &file_name)?) as Arc<dyn CompilationIndex>)
        }),
    )
}

#[test]
fn second_locate_reuses_index_and_config() {
    let project = Project::new();
    let db = project.compile_db(
        "",
        &[
            entry("src/a.cpp", "/no/such/proj", &["c++"]),
            entry("src/b.cpp", "/no/such/proj", &["c++"]),
        ],
    );
    let config = project.config("", "[flags]\nadd = [\"-Wall\"]\n");
    let cache = ProjectIndexCache::new();

    let first = cache.locate(&project.path("src/a.cpp")).unwrap().unwrap();

    // Nothing is re-read once cached.
    std::fs::remove_file(db).unwrap();
    std::fs::remove_file(config).unwrap();

    let second = cache.locate(&project.path("src/b.cpp")).unwrap().unwrap();

    assert!(Arc::ptr_eq(&first.index, &second.index));
    assert!(Arc::ptr_eq(
        first.config.as_ref().unwrap(),
        second.config.as_ref().unwrap()
    ));
    assert_eq!(first.root, project.root());
    assert_eq!(cache.len(), 1);
}

#[test]
fn resolution_keeps_working_after_files_change() {
    let project = Project::new();
    project.compile_db("", &[entry("a.c", "/no/such/proj", &["cc", "-DV1"])]);
    let resolver = Resolver::new(ProjectIndexCache::new());

    assert_eq!(resolver.flags_for_file(&project.path("a.c")).flags, ["cc", "-DV1"]);

    project.compile_db("", &[entry("a.c", "/no/such/proj", &["cc", "-DV2"])]);
    assert_eq!(resolver.flags_for_file(&project.path("a.c")).flags, ["cc", "-DV1"]);
}

#[test]
fn sibling_databases_share_config_above_them() {
    let project = Project::new();
    project.config("", "[flags]\nadd = [\"-DSHARED\"]\n");
    project.compile_db("app", &[entry("app/main.c", "/no/such/proj", &["cc"])]);
    project.compile_db("lib", &[entry("lib/util.c", "/no/such/proj", &["cc"])]);
    let cache = ProjectIndexCache::new();

    let app = cache.locate(&project.path("app/main.c")).unwrap().unwrap();
    let lib = cache.locate(&project.path("lib/util.c")).unwrap().unwrap();

    assert!(!Arc::ptr_eq(&app.index, &lib.index));
    assert!(Arc::ptr_eq(app.config.as_ref().unwrap(), lib.config.as_ref().unwrap()));
    assert_eq!(cache.len(), 2);
}

#[test]
fn nearest_config_wins() {
    let project = Project::new();
    project.config("", "[flags]\nadd = [\"-DOUTER\"]\n");
    project.config("proj", "[flags]\nadd = [\"-DINNER\"]\n");
    project.compile_db("proj", &[entry("proj/a.c", "/no/such/proj", &["cc"])]);
    let resolver = Resolver::new(ProjectIndexCache::new());

    assert_eq!(
        resolver.flags_for_file(&project.path("proj/a.c")).flags,
        ["cc", "-DINNER"]
    );
}

#[test]
fn project_without_config_caches_absence() {
    let project = Project::new();
    project.compile_db("", &[entry("a.c", "/no/such/proj", &["cc"])]);
    let cache = ProjectIndexCache::new();

    let entry = cache.locate(&project.path("a.c")).unwrap().unwrap();

    assert!(entry.config.is_none());
    assert_eq!(cache.cached_config(project.root()), Some(None));
}

#[test]
fn custom_file_names_are_honoured() {
    let project = Project::new();
    project.touch("a.c");
    let db = serde_json::json!([{
        "directory": "/no/such/proj",
        "file": project.path("a.c"),
        "arguments": ["cc", "-DCUSTOM"],
    }]);
    project.write("build.json", &db.to_string());
    project.write("flags.toml", "[flags]\nadd = [\"-Wall\"]\n");
    let cache = ProjectIndexCache::with_options(EngineOptions {
        database_file: "build.json".to_string(),
        config_file: "flags.toml".to_string(),
    });

    let response = Resolver::new(cache).flags_for_file(&project.path("a.c"));
    assert_eq!(response.flags, ["cc", "-DCUSTOM", "-Wall"]);
}

#[test]
fn concurrent_queries_open_one_index() {
    let project = Project::new();
    let files: Vec<String> = (0..8).map(|i| format!("src/f{i}.c")).collect();
    let entries: Vec<_> = files
        .iter()
        .map(|f| entry(f, "/no/such/proj", &["cc"]))
        .collect();
    project.compile_db("", &entries);

    let opens = Arc::new(AtomicUsize::new(0));
    let resolver = Resolver::new(counting_cache(opens.clone()));

    std::thread::scope(|s| {
        for file in &files {
            let resolver = &resolver;
            let path = project.path(file);
            s.spawn(move || {
                let response = resolver.flags_for_file(&path);
                assert!(response.cacheable);
            });
        }
    });

    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.cache().len(), 1);
}

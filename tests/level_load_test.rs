use hie_ngin::{DecodeError, LoadOptions, MeshFormat, TexturePathMaterials, load_level};

use crate::common::test_utils::{Descriptor, MeshRecord, mesh_stream, write_level};
mod common;

fn two_mesh_level() -> (Vec<u8>, String) {
    let stream = mesh_stream(&[MeshRecord::triangle_at([1.0, 0.0, 0.0]), MeshRecord::triangle_at([0.0, 5.0, 0.0])]);
    let descriptor = Descriptor::new(2)
        .texture("road")
        .translation(0.0, 0.0, -2.0)
        .node(1, 0, Some(1), None)
        .node(2, 0, Some(2), None)
        .node(3, 0, None, Some(3))
        .node(3, 1, None, None)
        .build();
    (stream, descriptor)
}

#[tokio::test]
async fn loads_and_assembles_a_level_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (stream, descriptor) = two_mesh_level();
    write_level(dir.path(), "Town", &stream, &descriptor);

    let options = LoadOptions::default().with_asset_root(dir.path());
    let level = load_level("Town", &options).await.unwrap();

    assert_eq!(level.name, "Town");
    assert_eq!(level.geometries.len(), 2);
    assert_eq!(level.descriptor.mesh_count, 2);
    assert_eq!(level.descriptor.texture_names, vec!["road"]);

    let mut materials = TexturePathMaterials::new(&level.name);
    let commands = level.assemble(&mut materials).unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[1].world_transform.w.y, 5.0);
    assert_eq!(commands[1].world_transform.w.z, -2.0);
}

#[tokio::test]
async fn missing_level_reports_the_level_name() {
    let dir = tempfile::tempdir().unwrap();
    let options = LoadOptions::default().with_asset_root(dir.path());

    let err = load_level("Harbour", &options).await.unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("could not load level Harbour"), "{chain}");
}

#[tokio::test]
async fn truncated_mesh_stream_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut stream, descriptor) = two_mesh_level();
    stream.truncate(stream.len() - 4);
    write_level(dir.path(), "Town", &stream, &descriptor);

    let options = LoadOptions::default().with_asset_root(dir.path());
    let err = load_level("Town", &options).await.unwrap_err();
    assert!(format!("{err:#}").contains("Town/Town.mshs"));
    assert!(matches!(
        err.downcast_ref::<DecodeError>(),
        Some(DecodeError::TruncatedStream { .. })
    ));
}

#[tokio::test]
async fn mesh_count_mismatch_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let stream = mesh_stream(&[MeshRecord::triangle_at([0.0, 0.0, 0.0])]);
    let descriptor = Descriptor::new(7).node(3, 0, None, None).build();
    write_level(dir.path(), "Town", &stream, &descriptor);

    let options = LoadOptions::default()
        .with_asset_root(dir.path())
        .with_mesh_format(MeshFormat::Extended);
    let level = load_level("Town", &options).await.unwrap();
    assert_eq!(level.descriptor.mesh_count, 7);
    assert_eq!(level.geometries.len(), 1);
}

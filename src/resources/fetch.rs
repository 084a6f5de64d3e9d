use std::path::Path;

use anyhow::Context;

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &Path, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("could not read page origin: {e:?}"))?;
    let root = asset_root.to_string_lossy();
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(asset_root: &Path, file_name: &str) -> anyhow::Result<String> {
    log::debug!("loading text asset {}", file_name);
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(asset_root, file_name)?;
        reqwest::get(url).await?.error_for_status()?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = asset_root.join(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(asset_root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    log::debug!("loading binary asset {}", file_name);
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        reqwest::get(url).await?.error_for_status()?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = asset_root.join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_relative_to_the_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Town")).unwrap();
        std::fs::write(dir.path().join("Town/Town.hie"), "\"Version\" 3").unwrap();
        std::fs::write(dir.path().join("Town/Town.mshs"), [1u8, 2, 3]).unwrap();

        let text = load_string(dir.path(), "Town/Town.hie").await.unwrap();
        assert_eq!(text, "\"Version\" 3");
        let bytes = load_binary(dir.path(), "Town/Town.mshs").await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_binary(dir.path(), "Nowhere/Nowhere.mshs").await.unwrap_err();
        assert!(err.to_string().contains("Nowhere.mshs"));
    }
}

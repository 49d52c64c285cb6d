use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Project types
    types.push(clean_type(ProjectType::export_to_string()?));
    types.push(clean_type(ProjectLinks::export_to_string()?));
    types.push(clean_type(Project::export_to_string()?));
    types.push(clean_type(CreateProjectRequest::export_to_string()?));
    types.push(clean_type(CreateProjectResponse::export_to_string()?));
    types.push(clean_type(CheckSlugResponse::export_to_string()?));
    types.push(clean_type(SlugQuery::export_to_string()?));

    // Claim types
    types.push(clean_type(ClaimBuildRequest::export_to_string()?));
    types.push(clean_type(VerifyClaimQuery::export_to_string()?));
    types.push(clean_type(ActionResponse::export_to_string()?));

    // Contact and like types
    types.push(clean_type(ContactRequest::export_to_string()?));
    types.push(clean_type(LikeRequest::export_to_string()?));
    types.push(clean_type(LikeStatus::export_to_string()?));

    // Upload types
    types.push(clean_type(UploadKind::export_to_string()?));
    types.push(clean_type(UploadResponse::export_to_string()?));

    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;

    println!("Generated TypeScript types at {}", output_path.display());

    Ok(())
}

/// Strip the per-file imports and banner ts-rs adds, since everything lands in one file
fn clean_type(ts: String) -> String {
    let filtered: Vec<&str> = ts
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}

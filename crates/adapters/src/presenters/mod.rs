use brick_review_domain::{BrickInfo, CaptureDetail, CaptureSummary, FieldValue, PointCloudInfo};

pub fn present_capture_row(capture: &CaptureSummary) -> String {
    format!(
        "{}\timages={}\t{}\t{}",
        capture.capture_id,
        capture.image_count,
        if capture.has_point_cloud { "pc" } else { "-" },
        match (&capture.has_labels, &capture.labeled_at) {
            (true, Some(at)) => format!("labeled {at}"),
            (true, None) => "labeled".to_string(),
            (false, _) => "unlabeled".to_string(),
        }
    )
}

pub fn present_capture_detail(detail: &CaptureDetail) -> String {
    let mut lines = vec![format!("capture {} ({})", detail.capture_id, detail.date)];
    let cameras: Vec<&str> = detail.camera_ids().collect();
    lines.push(format!(
        "cameras: {}",
        if cameras.is_empty() {
            "none".to_string()
        } else {
            cameras.join(", ")
        }
    ));
    lines.push(format!(
        "point cloud: {}",
        if detail.point_cloud_exists { "yes" } else { "no" }
    ));
    match detail.saved_labels() {
        Some(labels) => lines.push(format!(
            "labels: validity={:?} color={:?} shape={:?} markings={:?} \
             correct_color={} correct_shape={}",
            labels.validity,
            labels.color,
            labels.shape,
            labels.markings,
            labels.correct_color,
            labels.correct_shape
        )),
        None => lines.push("labels: none".to_string()),
    }
    lines.join("\n")
}

/// Label/value rows shared by the CLI and the info panel.
pub fn brick_info_rows(info: &BrickInfo) -> Vec<(String, String)> {
    let mut rows = vec![("Color Prediction".to_string(), info.color_prediction.clone())];
    let fixed = [
        ("Trigger ID", &info.trigger_id),
        ("Brick ID", &info.brick_id),
        ("Super ID", &info.super_id),
        ("Bucket Number", &info.bucket_number),
        ("Photo Timestamp", &info.photo_timestamp),
        ("Laser Timestamp", &info.laser_timestamp),
    ];
    for (title, value) in fixed {
        rows.push((title.to_string(), present_field(value.as_ref())));
    }
    for (key, value) in &info.extra {
        rows.push((title_case(key), value.to_string()));
    }
    rows
}

pub fn present_brick_info(info: &BrickInfo) -> String {
    let mut lines: Vec<String> = brick_info_rows(info)
        .into_iter()
        .map(|(title, value)| format!("{title}: {value}"))
        .collect();
    if let Some(rgb) = info.color_rgb {
        let [r, g, b] = rgb.to_rgb8();
        lines.push(format!("Color RGB: #{r:02x}{g:02x}{b:02x}"));
    }
    lines.join("\n")
}

pub fn present_point_cloud_info(info: &PointCloudInfo) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(points) = info.num_points {
        lines.push(format!("Points: {}", format_count(points)));
    }
    if let Some(megabytes) = info.file_size_mb() {
        lines.push(format!("File Size: {megabytes:.2} MB"));
    }
    lines
}

fn present_field(value: Option<&FieldValue>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// `1234567` becomes `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

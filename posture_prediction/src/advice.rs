//! Hand-written posture feedback shown to the user for each predicted class.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Advice {
    pub status: &'static str,
    pub problems: &'static [&'static str],
    pub suggestions: &'static [&'static str],
    pub severity: Severity,
    pub color: &'static str,
}

pub const NORMAL: Advice = Advice {
    status: "Baik",
    problems: &[],
    suggestions: &[
        "Postur tubuh Anda sudah baik!",
        "Pertahankan posisi duduk dan berdiri yang benar",
        "Lakukan stretching ringan secara rutin",
    ],
    severity: Severity::Low,
    color: "#4CAF50",
};

pub const FORWARD_HEAD_KYPHOSIS: Advice = Advice {
    status: "Perlu Perbaikan",
    problems: &[
        "Kepala terlalu maju (Forward Head Posture)",
        "Punggung atas membulat (Kyphosis)",
        "Dapat menyebabkan nyeri leher dan punggung",
    ],
    suggestions: &[
        "Lakukan chin tucks exercise 10-15 kali, 3 set per hari",
        "Perbaiki posisi layar komputer sejajar mata",
        "Strengthening otot leher bagian belakang",
        "Wall angel exercise untuk membuka dada",
        "Konsultasi dengan fisioterapis jika nyeri berlanjut",
    ],
    severity: Severity::Medium,
    color: "#FF9800",
};

pub const ANTERIOR_PELVIC_TILT: Advice = Advice {
    status: "Perlu Perbaikan",
    problems: &[
        "Panggul miring ke depan (Anterior Pelvic Tilt)",
        "Lordosis lumbal berlebihan",
        "Dapat menyebabkan nyeri punggung bawah",
    ],
    suggestions: &[
        "Strengthening otot glutes dan hamstring",
        "Stretching otot hip flexor dan erector spinae",
        "Dead bug exercise untuk core stability",
        "Posterior pelvic tilt exercise",
        "Hindari duduk terlalu lama tanpa istirahat",
    ],
    severity: Severity::Medium,
    color: "#F44336",
};

/// Unknown labels get the `normal` record.
pub fn advice_for(label: &str) -> &'static Advice {
    match label {
        "forward_head_kyphosis" => &FORWARD_HEAD_KYPHOSIS,
        "anterior_pelvic_tilt" => &ANTERIOR_PELVIC_TILT,
        "normal" => &NORMAL,
        other => {
            tracing::warn!("No advice for label {:?}, falling back to normal", other);
            &NORMAL
        }
    }
}

//! Fixed colors for the five node categories, plus the neutral fallback
//! used for anything the backend tags with an unknown (or no) category.

/// Fill, border and glow for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryColors {
	pub fill: &'static str,
	pub border: &'static str,
	pub glow: &'static str,
}

const EMOTION: CategoryColors = CategoryColors {
	fill: "#f472b6",
	border: "#ec4899",
	glow: "rgba(244, 114, 182, 0.55)",
};

const HABIT: CategoryColors = CategoryColors {
	fill: "#60a5fa",
	border: "#3b82f6",
	glow: "rgba(96, 165, 250, 0.55)",
};

const GOAL: CategoryColors = CategoryColors {
	fill: "#4ade80",
	border: "#22c55e",
	glow: "rgba(74, 222, 128, 0.55)",
};

const PROBLEM: CategoryColors = CategoryColors {
	fill: "#f87171",
	border: "#ef4444",
	glow: "rgba(248, 113, 113, 0.55)",
};

const SOLUTION: CategoryColors = CategoryColors {
	fill: "#facc15",
	border: "#eab308",
	glow: "rgba(250, 204, 21, 0.55)",
};

const NEUTRAL: CategoryColors = CategoryColors {
	fill: "#9ca3af",
	border: "#6b7280",
	glow: "rgba(156, 163, 175, 0.45)",
};

/// Look up the color triple for a category tag. Unknown or absent tags
/// get the neutral triple.
pub fn colors_for(category: Option<&str>) -> CategoryColors {
	match category {
		Some("emotion") => EMOTION,
		Some("habit") => HABIT,
		Some("goal") => GOAL,
		Some("problem") => PROBLEM,
		Some("solution") => SOLUTION,
		_ => NEUTRAL,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_categories_have_distinct_fills() {
		let tags = ["emotion", "habit", "goal", "problem", "solution"];
		for pair in tags.iter().enumerate() {
			for other in tags.iter().skip(pair.0 + 1) {
				assert_ne!(colors_for(Some(pair.1)).fill, colors_for(Some(other)).fill);
			}
		}
	}

	#[test]
	fn unknown_and_absent_fall_back_to_neutral() {
		assert_eq!(colors_for(Some("mystery")), NEUTRAL);
		assert_eq!(colors_for(None), NEUTRAL);
		assert_ne!(colors_for(Some("habit")), NEUTRAL);
	}
}

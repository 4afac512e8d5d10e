use leptos::prelude::*;

/// Big-number card with a caption, like the flow totals above the diagram.
#[component]
pub fn Metric(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
	view! {
		<div class="metric">
			<span class="metric-label">{label}</span>
			<span class="metric-value">{move || value.get()}</span>
		</div>
	}
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(value: u64) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

/// Thousands-separated with an explicit sign; zero gets `+`.
pub fn format_signed(value: i64) -> String {
	let sign = if value < 0 { '-' } else { '+' };
	format!("{sign}{}", format_thousands(value.unsigned_abs()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn groups_digits() {
		assert_eq!(format_thousands(0), "0");
		assert_eq!(format_thousands(999), "999");
		assert_eq!(format_thousands(1500), "1,500");
		assert_eq!(format_thousands(1234567), "1,234,567");
	}

	#[test]
	fn signs_net_flow() {
		assert_eq!(format_signed(200), "+200");
		assert_eq!(format_signed(0), "+0");
		assert_eq!(format_signed(-12500), "-12,500");
	}
}

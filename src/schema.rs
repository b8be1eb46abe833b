use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarType {
	Integer,
	Float,
	Text,
}

impl fmt::Display for ScalarType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ScalarType::Integer => "integer",
			ScalarType::Float => "float",
			ScalarType::Text => "string",
		})
	}
}

#[derive(Debug, Copy, Clone)]
pub struct Column {
	pub name: &'static str,
	pub ty: ScalarType,
}

const fn int(name: &'static str) -> Column {
	Column { name, ty: ScalarType::Integer }
}

const fn float(name: &'static str) -> Column {
	Column { name, ty: ScalarType::Float }
}

const fn text(name: &'static str) -> Column {
	Column { name, ty: ScalarType::Text }
}

/// Ordered, positional description of an input row.
#[derive(Debug)]
pub struct Schema {
	pub columns: &'static [Column],
}

impl Schema {
	pub fn len(&self) -> usize {
		self.columns.len()
	}
}

const PARTITIONED_COLUMNS: &[Column] = &[
	int("cust_id"),
	float("tot_income"),
	int("tot_age"),
	int("tot_cust_years"),
	int("tot_children"),
	int("female_ind"),
	int("single_ind"),
	int("married_ind"),
	int("separated_ind"),
	text("statecode"),
	int("ck_acct_ind"),
	int("sv_acct_ind"),
	int("cc_acct_ind"),
	float("ck_avg_bal"),
	float("sv_avg_bal"),
	float("cc_avg_bal"),
	float("ck_avg_tran_amt"),
	float("sv_avg_tran_amt"),
	float("cc_avg_tran_amt"),
	int("q1_trans_cnt"),
	int("q2_trans_cnt"),
	int("q3_trans_cnt"),
	int("q4_trans_cnt"),
	int("SAMPLE_ID"),
];

/// Per-partition rows, keyed by `statecode`.
pub static FIT_PARTITIONED: Schema = Schema {
	columns: PARTITIONED_COLUMNS,
};

/// The partitioned scoring stream carries the same data columns as the fit stream.
pub static SCORE_PARTITIONED: Schema = Schema {
	columns: PARTITIONED_COLUMNS,
};

pub static SCORE_SINGLE: Schema = Schema {
	columns: &[
		int("cust_id"),
		float("tot_income"),
		int("tot_age"),
		int("tot_cust_years"),
		int("tot_children"),
		int("female_ind"),
		int("single_ind"),
		int("married_ind"),
		int("separated_ind"),
		int("ca_resident_ind"),
		int("ny_resident_ind"),
		int("tx_resident_ind"),
		int("il_resident_ind"),
		int("az_resident_ind"),
		int("oh_resident_ind"),
		int("ck_acct_ind"),
		int("sv_acct_ind"),
		int("cc_acct_ind"),
		float("ck_avg_bal"),
		float("sv_avg_bal"),
		float("cc_avg_bal"),
		float("ck_avg_tran_amt"),
		float("sv_avg_tran_amt"),
		float("cc_avg_tran_amt"),
		int("q1_trans_cnt"),
		int("q2_trans_cnt"),
		int("q3_trans_cnt"),
		int("q4_trans_cnt"),
	],
};

pub const PREDICTORS: &[&str] = &[
	"tot_income",
	"tot_age",
	"tot_cust_years",
	"tot_children",
	"female_ind",
	"single_ind",
	"married_ind",
	"separated_ind",
	"ck_acct_ind",
	"sv_acct_ind",
	"ck_avg_bal",
	"sv_avg_bal",
	"ck_avg_tran_amt",
	"sv_avg_tran_amt",
	"q1_trans_cnt",
	"q2_trans_cnt",
	"q3_trans_cnt",
	"q4_trans_cnt",
];

pub const PROB_CLASS_0: &str = "Prob0";
pub const PROB_CLASS_1: &str = "Prob1";

/// Everything an adapter needs to know about one invocation variant.
#[derive(Debug)]
pub struct Layout {
	pub schema: &'static Schema,
	pub predictors: &'static [&'static str],
	pub target: &'static str,
	pub id: &'static str,
	pub partition: Option<&'static str>,
	/// Fields appended to every transport line after the data columns.
	pub trailing: usize,
}

impl Layout {
	/// Output column order of the scoring variants.
	pub fn score_columns(&self) -> Vec<&'static str> {
		let mut columns = vec![self.id];
		columns.extend(self.partition);
		columns.extend([PROB_CLASS_0, PROB_CLASS_1, self.target]);
		columns
	}
}

pub static FIT_LAYOUT: Layout = Layout {
	schema: &FIT_PARTITIONED,
	predictors: PREDICTORS,
	target: "cc_acct_ind",
	id: "cust_id",
	partition: Some("statecode"),
	trailing: 0,
};

pub static SCORE_SINGLE_LAYOUT: Layout = Layout {
	schema: &SCORE_SINGLE,
	predictors: PREDICTORS,
	target: "cc_acct_ind",
	id: "cust_id",
	partition: None,
	trailing: 0,
};

/// Every line ends with a row-number field and the payload field.
pub static SCORE_PARTITIONED_LAYOUT: Layout = Layout {
	schema: &SCORE_PARTITIONED,
	predictors: PREDICTORS,
	target: "cc_acct_ind",
	id: "cust_id",
	partition: Some("statecode"),
	trailing: 2,
};

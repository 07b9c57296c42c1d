use std::cell::RefCell;
use std::rc::Rc;

use fwa_testfunctions::{quadratic, sphere};
use ndarray::Array1;

use crate::{
	BbfwaBuilder, CallbackAction, FireworksOptimizer, FwaIntermediate, LotfwaBuilder, RunState,
	Termination, pointwise, run_recorded,
};

#[test]
fn test_recorded_bbfwa() {
	let dir = tempfile::tempdir().unwrap();
	let opt = BbfwaBuilder::new()
		.evaluator(pointwise(quadratic))
		.dim(2)
		.bounds(-5.0, 5.0)
		.max_iter(30)
		.max_eval(10_000)
		.sp_size(20)
		.init_amp(2.0)
		.seed(42)
		.build()
		.unwrap();

	let (report, csv_path) = run_recorded("quadratic", opt, dir.path()).unwrap();
	assert!(csv_path.exists());
	assert_eq!(report.nit, 30);

	let csv_content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
	let lines: Vec<&str> = csv_content.trim().lines().collect();

	// header plus one line per iteration
	assert_eq!(lines.len(), 31);
	assert_eq!(lines[0], "iteration,x0,x1,best_result,amplitude,evaluations,is_improvement");
	assert!(lines[1].starts_with("1,"));
	assert!(lines[30].starts_with("30,"));
	assert!(lines[30].contains(&format!(",{},", report.nfev)));
}

#[test]
fn test_recorded_lotfwa() {
	let dir = tempfile::tempdir().unwrap();
	let opt = LotfwaBuilder::new()
		.evaluator(pointwise(sphere))
		.dim(3)
		.bounds(-10.0, 10.0)
		.max_iter(20)
		.max_eval(3000)
		.fw_size(3)
		.sp_size(60)
		.init_amp(4.0)
		.seed(7)
		.build()
		.unwrap();
	let expected_iterations = opt.max_iter();
	assert_eq!(expected_iterations, 20);

	let (report, csv_path) = run_recorded("sphere_lotfwa", opt, dir.path()).unwrap();
	assert_eq!(report.nit, expected_iterations);

	let csv_content = std::fs::read_to_string(&csv_path).unwrap();
	let lines: Vec<&str> = csv_content.trim().lines().collect();
	assert_eq!(lines.len(), expected_iterations + 1);
	assert!(lines[0].starts_with("iteration,x0,x1,x2,best_result"));
}

#[test]
fn test_callback_stops_run() {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	let opt = BbfwaBuilder::new()
		.evaluator(pointwise(sphere))
		.max_iter(1000)
		.max_eval(100_000)
		.sp_size(10)
		.seed(5)
		.callback(Box::new(move |it: &FwaIntermediate| {
			sink.borrow_mut().push(it.iter);
			if it.iter >= 3 { CallbackAction::Stop } else { CallbackAction::Continue }
		}))
		.build()
		.unwrap();

	let report = opt.run().unwrap();
	assert_eq!(*seen.borrow(), vec![1, 2, 3]);
	assert_eq!(report.nit, 3);
	assert_eq!(report.nfev, 1 + 3 * 10);
	assert_eq!(report.termination, Some(Termination::Callback));
}

#[test]
fn test_terminated_run_stays_terminated() {
	let mut opt = BbfwaBuilder::new()
		.evaluator(pointwise(sphere))
		.max_iter(2)
		.sp_size(5)
		.seed(9)
		.build()
		.unwrap();
	while opt.step().unwrap() {}
	assert_eq!(opt.state(), RunState::Terminated);
	let nfev = opt.evaluations();

	assert!(!opt.step().unwrap());
	opt.initialize().unwrap();
	assert_eq!(opt.evaluations(), nfev);
	assert_eq!(opt.iterations(), 2);
	assert_eq!(opt.report().termination, Some(Termination::MaxIterations(2)));
}

#[test]
fn test_report_before_start() {
	let opt = LotfwaBuilder::new().evaluator(pointwise(sphere)).seed(1).build().unwrap();
	let report = opt.report();
	assert_eq!(report.nfev, 0);
	assert_eq!(report.nit, 0);
	assert_eq!(report.seed, 1);
	assert!(report.termination.is_none());
	assert_eq!(report.message, "Not started");
}

#[test]
fn test_unseeded_run_reports_its_seed() {
	let first = BbfwaBuilder::new()
		.evaluator(pointwise(sphere))
		.max_iter(5)
		.sp_size(8)
		.build()
		.unwrap()
		.run()
		.unwrap();

	let replay = BbfwaBuilder::new()
		.evaluator(pointwise(sphere))
		.max_iter(5)
		.sp_size(8)
		.seed(first.seed)
		.build()
		.unwrap()
		.run()
		.unwrap();
	assert_eq!(first.x, replay.x);
	assert_eq!(first.fun, replay.fun);
}

#[test]
fn test_best_matches_population() {
	let mut opt = LotfwaBuilder::new()
		.evaluator(pointwise(|x: &Array1<f64>| x.iter().map(|xi| xi.abs()).sum()))
		.dim(2)
		.bounds(-1.0, 1.0)
		.max_eval(2000)
		.fw_size(4)
		.sp_size(40)
		.init_amp(0.5)
		.seed(3)
		.build()
		.unwrap();
	while opt.step().unwrap() {
		let pop = opt.population().unwrap();
		let (idx, f) = pop.best();
		let (x, best_f) = opt.best().unwrap();
		assert_eq!(best_f, f);
		assert_eq!(x.view(), pop.position(idx));
	}
}
